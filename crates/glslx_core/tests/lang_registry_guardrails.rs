use std::collections::HashMap;

use glslx_core::lang::extensions;
use glslx_core::lang::keywords;
use glslx_core::lang::operators;
use glslx_core::lang::punctuation;
use glslx_core::lang::reserved;
use glslx_core::lang::types;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);
        assert!(!info.usage.is_empty(), "keyword {} has no usage", info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn operators_and_punctuation_do_not_overlap() {
    for op in operators::OPERATORS {
        assert_eq!(operators::from_str(op.canonical), Some(op.id));
        assert!(
            punctuation::from_str(op.canonical).is_none(),
            "operator {} is also punctuation",
            op.canonical
        );
    }
    for p in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(p.canonical), Some(p.id));
        assert_eq!(p.canonical.chars().count(), 1, "punctuation must be a single char");
    }
}

#[test]
fn builtin_types_are_not_keywords_or_reserved() {
    for t in types::BUILTIN_TYPES {
        assert_eq!(types::from_str(t.canonical), Some(t.id));
        assert!(keywords::from_str(t.canonical).is_none(), "{} is a keyword", t.canonical);
        assert!(!reserved::is_reserved(t.canonical), "{} is reserved", t.canonical);
    }
}

#[test]
fn reserved_words_are_not_keywords() {
    for word in reserved::RESERVED_WORDS {
        assert!(keywords::from_str(word).is_none(), "{word} is both reserved and a keyword");
    }
}

#[test]
fn extension_builtins_belong_to_one_extension() {
    let mut seen = HashMap::new();
    for ext in extensions::EXTENSIONS {
        assert_eq!(extensions::from_str(ext.canonical), Some(ext.id));
        for name in ext.builtins {
            if let Some(prev) = seen.insert(*name, ext.id) {
                panic!("{name} gated by both {prev:?} and {:?}", ext.id);
            }
        }
    }
}
