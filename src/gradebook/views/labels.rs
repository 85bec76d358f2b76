//! Label projection for selectable items.

use crate::gradebook::models::{Student, Subject};

/// Anything that can be shown as a pickable item.
pub trait Labeled {
    fn item_id(&self) -> i64;
    fn label(&self) -> String;
}

impl Labeled for Student {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Labeled for Subject {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Label of the selected item, `"-"` when nothing is selected and the
/// placeholder `"ID {id}"` when the selection is not in `items`.
pub fn selection_label<T: Labeled>(items: &[T], selected: Option<i64>) -> String {
    match selected {
        None => "-".to_string(),
        Some(id) => items
            .iter()
            .find(|item| item.item_id() == id)
            .map(Labeled::label)
            .unwrap_or_else(|| format!("ID {id}")),
    }
}
