//! Language detection and split-point tables.
//!
//! Only files whose extension appears in the table below are indexed;
//! everything else in a source directory is skipped.

use serde::{Deserialize, Serialize};

/// Languages the chunker understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Cpp,
    Go,
    Java,
    Kotlin,
    Js,
    Ts,
    Php,
    Proto,
    Python,
    Rst,
    Ruby,
    Rust,
    Scala,
    Swift,
    Markdown,
    Latex,
    Html,
    Sol,
    CSharp,
}

impl Lang {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Js => "js",
            Self::Ts => "ts",
            Self::Php => "php",
            Self::Proto => "proto",
            Self::Python => "python",
            Self::Rst => "rst",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Scala => "scala",
            Self::Swift => "swift",
            Self::Markdown => "markdown",
            Self::Latex => "latex",
            Self::Html => "html",
            Self::Sol => "sol",
            Self::CSharp => "csharp",
        }
    }

    /// Separators tried in order by the splitter, most structural first.
    /// Every list ends with `["\n\n", "\n", " ", ""]` so any text can be
    /// split down to the size limit.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn separators(self) -> &'static [&'static str] {
        match self {
            Self::Cpp => &[
                "\nclass ", "\nvoid ", "\nint ", "\nfloat ", "\ndouble ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Go => &[
                "\nfunc ", "\nvar ", "\nconst ", "\ntype ", "\nif ", "\nfor ", "\nswitch ",
                "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Java => &[
                "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nif ",
                "\nfor ", "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Kotlin => &[
                "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\ninternal ",
                "\ncompanion ", "\nfun ", "\nval ", "\nvar ", "\nif ", "\nfor ", "\nwhile ",
                "\nwhen ", "\nelse ", "\n\n", "\n", " ", "",
            ],
            Self::Js => &[
                "\nfunction ", "\nconst ", "\nlet ", "\nvar ", "\nclass ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ", "\ndefault ", "\n\n", "\n", " ", "",
            ],
            Self::Ts => &[
                "\nenum ", "\ninterface ", "\nnamespace ", "\ntype ", "\nfunction ", "\nconst ",
                "\nlet ", "\nvar ", "\nclass ", "\nif ", "\nfor ", "\nwhile ", "\nswitch ",
                "\ncase ", "\ndefault ", "\n\n", "\n", " ", "",
            ],
            Self::Php => &[
                "\nfunction ", "\nclass ", "\nif ", "\nforeach ", "\nwhile ", "\ndo ",
                "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Proto => &[
                "\nmessage ", "\nservice ", "\nenum ", "\noption ", "\nimport ", "\nsyntax ",
                "\n\n", "\n", " ", "",
            ],
            Self::Python => &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""],
            Self::Rst => &["\n\n.. ", "\n\n", "\n", " ", ""],
            Self::Ruby => &[
                "\ndef ", "\nclass ", "\nmodule ", "\nif ", "\nunless ", "\nwhile ", "\nfor ",
                "\nbegin ", "\nrescue ", "\n\n", "\n", " ", "",
            ],
            Self::Rust => &[
                "\nfn ", "\npub ", "\nimpl ", "\nstruct ", "\nenum ", "\ntrait ", "\nmod ",
                "\nconst ", "\nlet ", "\nif ", "\nwhile ", "\nfor ", "\nloop ", "\nmatch ",
                "\n\n", "\n", " ", "",
            ],
            Self::Scala => &[
                "\nclass ", "\nobject ", "\ndef ", "\nval ", "\nvar ", "\nif ", "\nfor ",
                "\nwhile ", "\nmatch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Swift => &[
                "\nfunc ", "\nclass ", "\nstruct ", "\nenum ", "\nif ", "\nfor ", "\nwhile ",
                "\ndo ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Markdown => &[
                "\n# ", "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ", "\n\n---\n\n",
                "\n\n***\n\n", "\n\n", "\n", " ", "",
            ],
            Self::Latex => &[
                "\n\\chapter{", "\n\\section{", "\n\\subsection{", "\n\\subsubsection{",
                "\n\\begin{", "\n\n", "\n", " ", "",
            ],
            Self::Html => &[
                "<body", "<div", "<p", "<br", "<li", "<h1", "<h2", "<h3", "<h4", "<h5", "<h6",
                "<span", "<table", "<tr", "<td", "<th", "<ul", "<ol", "<header", "<footer",
                "<nav", "<head", "<style", "<script", "<meta", "<title", "\n\n", "\n", " ", "",
            ],
            Self::Sol => &[
                "\npragma ", "\nusing ", "\ncontract ", "\ninterface ", "\nlibrary ",
                "\nconstructor ", "\ntype ", "\nfunction ", "\nevent ", "\nmodifier ",
                "\nerror ", "\nstruct ", "\nenum ", "\nif ", "\nfor ", "\nwhile ",
                "\nassembly ", "\n\n", "\n", " ", "",
            ],
            Self::CSharp => &[
                "\ninterface ", "\nenum ", "\ndelegate ", "\nevent ", "\nclass ", "\nabstract ",
                "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nif ", "\nfor ",
                "\nforeach ", "\nwhile ", "\nswitch ", "\ncase ", "\nelse ", "\n\n", "\n", " ",
                "",
            ],
        }
    }
}

/// Map a file extension (without the dot, case-sensitive) to its language.
/// Returns `None` for anything outside the supported set.
#[must_use]
pub fn detect_language(extension: &str) -> Option<Lang> {
    let lang = match extension {
        "cpp" => Lang::Cpp,
        "go" => Lang::Go,
        "java" => Lang::Java,
        "kt" => Lang::Kotlin,
        "js" => Lang::Js,
        "ts" => Lang::Ts,
        "php" => Lang::Php,
        "proto" => Lang::Proto,
        "py" => Lang::Python,
        "rst" => Lang::Rst,
        "rb" => Lang::Ruby,
        "rs" => Lang::Rust,
        "scala" => Lang::Scala,
        "swift" => Lang::Swift,
        "md" => Lang::Markdown,
        "tex" => Lang::Latex,
        "html" => Lang::Html,
        "sol" => Lang::Sol,
        "cs" => Lang::CSharp,
        _ => return None,
    };
    Some(lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map() {
        assert_eq!(detect_language("py"), Some(Lang::Python));
        assert_eq!(detect_language("rs"), Some(Lang::Rust));
        assert_eq!(detect_language("kt"), Some(Lang::Kotlin));
        assert_eq!(detect_language("cs"), Some(Lang::CSharp));
    }

    #[test]
    fn unknown_extensions_are_none() {
        assert_eq!(detect_language("txt"), None);
        assert_eq!(detect_language("json"), None);
        assert_eq!(detect_language(""), None);
    }

    #[test]
    fn detection_is_case_sensitive() {
        assert_eq!(detect_language("PY"), None);
        assert_eq!(detect_language("Rs"), None);
    }

    #[test]
    fn every_separator_list_ends_with_fallbacks() {
        let langs = [
            Lang::Cpp,
            Lang::Go,
            Lang::Java,
            Lang::Kotlin,
            Lang::Js,
            Lang::Ts,
            Lang::Php,
            Lang::Proto,
            Lang::Python,
            Lang::Rst,
            Lang::Ruby,
            Lang::Rust,
            Lang::Scala,
            Lang::Swift,
            Lang::Markdown,
            Lang::Latex,
            Lang::Html,
            Lang::Sol,
            Lang::CSharp,
        ];
        for lang in langs {
            let seps = lang.separators();
            let n = seps.len();
            assert!(n >= 4, "{} has too few separators", lang.id());
            assert_eq!(seps[n - 1], "", "{} must end with \"\"", lang.id());
            assert_eq!(seps[n - 2], " ");
            assert_eq!(seps[n - 3], "\n");
        }
    }

    #[test]
    fn lang_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Lang::Python).unwrap(), "\"python\"");
        assert_eq!(serde_json::to_string(&Lang::CSharp).unwrap(), "\"csharp\"");
    }
}
