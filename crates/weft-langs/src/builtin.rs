//! Languages bundled with this crate, each behind its own cargo feature.

use std::sync::{Arc, LazyLock};

use crate::{Lang, LangInner};

/// Lookup row for one enabled language.
struct Entry {
    /// Canonical name first.
    names: &'static [&'static str],
    extensions: &'static [&'static str],
    load: fn() -> Lang,
}

macro_rules! builtin_langs {
    ($(
        $feature:literal => fn $fn_name:ident {
            name: $name:literal,
            grammar: $grammar:path,
            lexer: $lexer:path,
            aliases: [$($alias:literal),* $(,)?],
            extensions: [$($ext:literal),* $(,)?] $(,)?
        }
    )*) => {
        $(
            /// Shared instance; the grammar is built on first use.
            #[cfg(feature = $feature)]
            pub fn $fn_name() -> Lang {
                static LANG: LazyLock<Lang> = LazyLock::new(|| match $grammar() {
                    Ok(grammar) => Arc::new(LangInner::new($name, grammar, $lexer)),
                    Err(err) => panic!("built-in grammar `{}` is invalid: {err}", $name),
                });
                Arc::clone(&LANG)
            }
        )*

        const ENTRIES: &[Entry] = &[
            $(
                #[cfg(feature = $feature)]
                Entry {
                    names: &[$name, $($alias),*],
                    extensions: &[$($ext),*],
                    load: $fn_name,
                },
            )*
        ];
    };
}

builtin_langs! {
    "lang-script" => fn script {
        name: "script",
        grammar: crate::script::grammar,
        lexer: crate::script::lex,
        aliases: ["wscript"],
        extensions: ["ws"],
    }
    "lang-blocks" => fn blocks {
        name: "blocks",
        grammar: crate::blocks::grammar,
        lexer: crate::script::lex,
        aliases: ["wblocks"],
        extensions: ["wb"],
    }
}

/// Case-insensitive lookup by canonical name or alias.
pub fn from_name(name: &str) -> Option<Lang> {
    let name = name.to_ascii_lowercase();
    find(|entry| entry.names.contains(&name.as_str()))
}

/// Case-insensitive lookup by file extension, with or without the leading dot.
pub fn from_ext(ext: &str) -> Option<Lang> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    find(|entry| entry.extensions.contains(&ext.as_str()))
}

/// Every enabled language, in declaration order.
pub fn all() -> Vec<Lang> {
    ENTRIES.iter().map(|entry| (entry.load)()).collect()
}

fn find(matches: impl Fn(&Entry) -> bool) -> Option<Lang> {
    ENTRIES
        .iter()
        .find(|entry| matches(entry))
        .map(|entry| (entry.load)())
}
