use std::collections::HashMap;
use std::fmt;

use crate::ids::RuntimeId;

/// Implements the closed, name-addressable enums used across rulesets and
/// requirement universals. Rule names are matched case-insensitively.
#[macro_export]
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn by_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(name))
            }

            #[inline]
            pub fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// Entities that carry a stable rule name and a display label.
pub trait Named {
    fn rule_name(&self) -> &str;
    fn label(&self) -> &str;
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Dense, id-indexed store of one entity category with a name index.
pub struct Catalog<Tag, T> {
    items: Vec<T>,
    by_name: HashMap<String, RuntimeId<Tag>>,
}

impl<Tag, T: fmt::Debug> fmt::Debug for Catalog<Tag, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<Tag, T: Clone> Clone for Catalog<Tag, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            by_name: self.by_name.clone(),
        }
    }
}

impl<Tag, T> Default for Catalog<Tag, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<Tag, T: Named> Catalog<Tag, T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let by_name = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (fold(item.rule_name()), RuntimeId::new(idx as u16)))
            .collect();
        Self { items, by_name }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RuntimeId<Tag>) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn contains(&self, id: RuntimeId<Tag>) -> bool {
        id.index() < self.items.len()
    }

    pub fn id_by_name(&self, name: &str) -> Option<RuntimeId<Tag>> {
        self.by_name.get(&fold(name)).copied()
    }

    pub fn rule_name(&self, id: RuntimeId<Tag>) -> Option<&str> {
        self.get(id).map(Named::rule_name)
    }

    pub fn label(&self, id: RuntimeId<Tag>) -> Option<&str> {
        self.get(id).map(Named::label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuntimeId<Tag>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| (RuntimeId::new(idx as u16), item))
    }

    pub fn ids(&self) -> impl Iterator<Item = RuntimeId<Tag>> {
        (0..self.items.len()).map(|idx| RuntimeId::new(idx as u16))
    }
}

/// User-defined flag names of one category (tech flags, unit flags, ...).
#[derive(Clone, Debug, Default)]
pub struct FlagNames {
    names: Vec<String>,
}

impl FlagNames {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<u16> {
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|idx| idx as u16)
    }

    pub fn name(&self, raw: u16) -> Option<&str> {
        self.names.get(raw as usize).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Thing(&'static str);

    impl Named for Thing {
        fn rule_name(&self) -> &str {
            self.0
        }
        fn label(&self) -> &str {
            self.0
        }
    }

    enum ThingTag {}

    #[test]
    fn catalog_lookup_is_case_insensitive() {
        let catalog: Catalog<ThingTag, Thing> =
            Catalog::from_items(vec![Thing("Bronze Working"), Thing("Alphabet")]);
        let id = catalog.id_by_name("alphabet").unwrap();
        assert_eq!(id.raw, 1);
        assert_eq!(catalog.rule_name(id), Some("Alphabet"));
        assert!(catalog.id_by_name("Writing").is_none());
        assert!(!catalog.contains(RuntimeId::new(2)));
    }

    #[test]
    fn flag_names_resolve_both_ways() {
        let flags = FlagNames::new(vec!["Diplomat".into(), "Capturer".into()]);
        assert_eq!(flags.by_name("capturer"), Some(1));
        assert_eq!(flags.name(0), Some("Diplomat"));
        assert_eq!(flags.name(5), None);
    }

    crate::named_enum! {
        enum Color {
            Red => "Red",
            Green => "Green",
        }
    }

    #[test]
    fn named_enum_roundtrips_names_and_indices() {
        assert_eq!(Color::by_name("green"), Some(Color::Green));
        assert_eq!(Color::from_index(Color::Red.index()), Some(Color::Red));
        assert_eq!(Color::Green.to_string(), "Green");
        assert_eq!(Color::from_index(7), None);
    }
}
