use super::Error;
use scraper::ElementRef;

/// Errors if there is not exactly one non-blank text node inside the element
pub fn get_inner_text<'a>(element: ElementRef<'a>, text_label: &str) -> Result<&'a str, Error> {
    let mut text_iter = element.text().filter(|t| !t.trim().is_empty());
    let text_node = text_iter.next().ok_or_else(|| {
        Error::TextNodeParse(format!("{text_label} should have text inside."))
    })?;

    if text_iter.next().is_some() {
        // capitalize the first letter of the text node
        let mut text_label = text_label.to_string();
        text_label[..1].make_ascii_uppercase();
        return Err(Error::TextNodeParse(format!(
            "{text_label} element should only have one text node inside of it."
        )));
    }
    Ok(text_node)
}

/// Every non-blank text node below the element, trimmed. `<br>` and other tags split fragments.
pub fn text_fragments<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element.text().map(str::trim).filter(|t| !t.is_empty())
}

/// Like [`text_fragments`] but only looks at text nodes that are direct children of the element,
/// so notes wrapped in nested tags are skipped.
pub fn own_text_fragments<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|t| !t.is_empty())
}
