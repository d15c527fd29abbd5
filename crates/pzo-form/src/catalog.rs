//! Static topping catalog and size labels. Immutable for the process lifetime.

use pzo_schemas::ToppingView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToppingOption {
    pub id: &'static str,
    pub label: &'static str,
}

impl ToppingOption {
    pub fn to_view(&self) -> ToppingView {
        ToppingView {
            id: self.id.to_string(),
            label: self.label.to_string(),
        }
    }
}

pub static TOPPINGS: [ToppingOption; 5] = [
    ToppingOption {
        id: "1",
        label: "Pepperoni",
    },
    ToppingOption {
        id: "2",
        label: "Green Peppers",
    },
    ToppingOption {
        id: "3",
        label: "Pineapple",
    },
    ToppingOption {
        id: "4",
        label: "Mushrooms",
    },
    ToppingOption {
        id: "5",
        label: "Ham",
    },
];

/// `(code, label)` pairs in display order.
pub const SIZE_OPTIONS: [(&str, &str); 3] = [("S", "small"), ("M", "medium"), ("L", "large")];

pub fn find_topping(id: &str) -> Option<&'static ToppingOption> {
    TOPPINGS.iter().find(|t| t.id == id)
}

pub fn size_label(code: &str) -> Option<&'static str> {
    SIZE_OPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in TOPPINGS.iter().enumerate() {
            for b in TOPPINGS.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(find_topping("3").map(|t| t.label), Some("Pineapple"));
        assert!(find_topping("9").is_none());
        assert_eq!(size_label("L"), Some("large"));
        assert_eq!(size_label(""), None);
    }
}
