use std::sync::OnceLock;

use scraper::Selector;

/// A css selector that is compiled the first time it is used.
/// Can be stored in statics, which lets a whole page layout be described at compile time.
#[derive(Debug)]
pub struct StaticSelector<'a> {
    cell: OnceLock<Selector>,
    selector: &'a str,
}

impl<'a> StaticSelector<'a> {
    pub const fn new(selector: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            selector,
        }
    }

    pub const fn as_str(&self) -> &'a str {
        self.selector
    }
}

impl core::ops::Deref for StaticSelector<'_> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Selector::parse(self.selector) {
                Ok(sel) => sel,
                Err(e) => panic!("Error parsing static selector {}: {:?}", self.selector, e),
            })
    }
}
