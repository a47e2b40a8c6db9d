use crate::app_name::AppName;

/// Raw image bytes generated for one application name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    pub name: AppName,
    pub bytes: Vec<u8>,
}

/// Generated icons keyed by application name.
///
/// Iteration follows first insertion order; inserting a name that is already present
/// replaces its bytes in place.
#[derive(Debug, Default, Clone)]
pub struct IconSet {
    icons: Vec<GeneratedIcon>,
}

impl IconSet {
    pub fn new() -> IconSet {
        IconSet { icons: Vec::new() }
    }

    /// Returns the previous bytes when `name` was already present.
    pub fn insert(&mut self, name: AppName, bytes: Vec<u8>) -> Option<Vec<u8>> {
        match self.icons.iter_mut().find(|icon| icon.name == name) {
            Some(icon) => Some(std::mem::replace(&mut icon.bytes, bytes)),
            None => {
                self.icons.push(GeneratedIcon { name, bytes });
                None
            }
        }
    }

    pub fn get(&self, name: &AppName) -> Option<&[u8]> {
        self.icons.iter()
            .find(|icon| &icon.name == name)
            .map(|icon| icon.bytes.as_slice())
    }

    pub fn contains(&self, name: &AppName) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedIcon> {
        self.icons.iter()
    }

    pub fn clear(&mut self) {
        self.icons.clear();
    }
}
