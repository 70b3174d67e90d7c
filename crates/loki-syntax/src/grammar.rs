//! Per-language grammar tables consumed by [`crate::engine`].

/// A language grammar: keyword lists, comment/string/number rules, and the
/// separator set the row-highlight procedure scans against (§4.2).
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub tag: &'static str,
    pub primary_keywords: &'static [&'static str],
    /// Keywords ending in `|` in the source list (type names) get this class.
    pub secondary_keywords: &'static [&'static str],
    /// Up to three bytes.
    pub single_line_comment: &'static str,
    /// Up to six bytes each.
    pub ml_comment_open: &'static str,
    pub ml_comment_close: &'static str,
    pub separators: &'static str,
    /// Opener/closer token sets, consulted by the indent engine (§4.7).
    pub openers: &'static str,
    pub closers: &'static str,
}

pub const PLAIN: Grammar = Grammar {
    tag: "plain",
    primary_keywords: &[],
    secondary_keywords: &[],
    single_line_comment: "",
    ml_comment_open: "",
    ml_comment_close: "",
    separators: ",.()+-/*=~%<>[]{};: \t\n",
    openers: "",
    closers: "",
};

pub const RUST: Grammar = Grammar {
    tag: "rust",
    primary_keywords: &[
        "fn", "let", "mut", "if", "else", "match", "loop", "while", "for", "in", "return",
        "break", "continue", "struct", "enum", "impl", "trait", "pub", "use", "mod", "const",
        "static", "async", "await", "move", "ref", "as", "where", "dyn", "unsafe", "self",
        "super", "crate",
    ],
    secondary_keywords: &[
        "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
        "bool", "char", "str", "String", "Vec", "Option", "Result", "Box", "Self",
    ],
    single_line_comment: "//",
    ml_comment_open: "/*",
    ml_comment_close: "*/",
    separators: ",.()+-/*=~%<>[]{};: \t\n&|^!?",
    openers: "{([",
    closers: "})]",
};

pub const C: Grammar = Grammar {
    tag: "c",
    primary_keywords: &[
        "if", "else", "switch", "case", "default", "for", "while", "do", "return", "break",
        "continue", "goto", "struct", "union", "enum", "typedef", "static", "extern", "const",
        "sizeof", "void",
    ],
    secondary_keywords: &[
        "int", "long", "short", "char", "float", "double", "unsigned", "signed", "size_t",
    ],
    single_line_comment: "//",
    ml_comment_open: "/*",
    ml_comment_close: "*/",
    separators: ",.()+-/*=~%<>[]{};: \t\n&|^!?",
    openers: "{([",
    closers: "})]",
};

pub const MARKDOWN: Grammar = Grammar {
    tag: "markdown",
    primary_keywords: &[],
    secondary_keywords: &[],
    single_line_comment: "",
    ml_comment_open: "",
    ml_comment_close: "",
    separators: " \t\n",
    openers: "",
    closers: "",
};

/// Sectioned (INI-like) grammar: rows carry a section tag consulted by
/// [`crate::sectioned`].
pub const INI: Grammar = Grammar {
    tag: "ini",
    primary_keywords: &[],
    secondary_keywords: &[],
    single_line_comment: ";",
    ml_comment_open: "",
    ml_comment_close: "",
    separators: "= \t\n",
    openers: "",
    closers: "",
};

/// Look up a built-in grammar by its file-extension-derived tag, falling
/// back to [`PLAIN`] for unrecognized extensions (§7 `no-language`).
pub fn by_extension(ext: &str) -> Grammar {
    match ext {
        "rs" => RUST,
        "c" | "h" | "cc" | "cpp" | "hpp" => C,
        "md" | "markdown" => MARKDOWN,
        "ini" | "cfg" | "toml" => INI,
        _ => PLAIN,
    }
}

/// Look up a built-in grammar by its Markdown fence-tag name (e.g. `rust`,
/// `c`), falling back to [`PLAIN`] for unrecognized tags.
pub fn by_name(name: &str) -> Grammar {
    match name {
        "rust" | "rs" => RUST,
        "c" | "cpp" | "c++" => C,
        "markdown" | "md" => MARKDOWN,
        "ini" | "toml" => INI,
        _ => PLAIN,
    }
}

/// True when `b` is in the grammar's separator set or is a row boundary.
pub fn is_separator(grammar: &Grammar, b: Option<u8>) -> bool {
    match b {
        None => true,
        Some(b) => grammar.separators.as_bytes().contains(&b),
    }
}
