//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! All lookups match on the local tag name, so `<srw:numberOfRecords>` and
//! `<numberOfRecords>` are found the same way.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexml_harvester::xml::get_tag_name;
///
/// let xml = r#"<dc xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Lei</dc:title></dc>"#;
/// let doc = Document::parse(xml).unwrap();
/// let title = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(title), "title");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexml_harvester::xml::find_child;
///
/// let xml = r#"<root><child1/><child2/></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "child1").is_some());
/// assert!(find_child(root, "missing").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the text content of a node, trimmed.
///
/// Returns an empty string if the node has no text.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed text of the first child element named `tag`.
///
/// `None` when the child is absent; `Some("")` when it is present but empty.
pub fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    find_child(node, tag).map(get_text)
}

/// Collect all elements at a given nesting depth below `root`.
///
/// `root` itself is depth 1, its element children depth 2, and so on.
/// Document order is preserved.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use lexml_harvester::xml::elements_at_depth;
///
/// let xml = r#"<a><b><c/><c/></b><b><c/></b></a>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(elements_at_depth(doc.root_element(), 3).len(), 3);
/// ```
pub fn elements_at_depth<'a, 'input>(root: Node<'a, 'input>, depth: usize) -> Vec<Node<'a, 'input>> {
    if depth == 0 {
        return Vec::new();
    }

    let mut level = vec![root];
    for _ in 1..depth {
        level = level.into_iter().flat_map(element_children).collect();
        if level.is_empty() {
            break;
        }
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<srw:searchRetrieveResponse xmlns:srw="http://www.loc.gov/zing/srw/"><srw:version/></srw:searchRetrieveResponse>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "searchRetrieveResponse");
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<records><record>1</record><other/><record>2</record></records>"#;
        let doc = Document::parse(xml).unwrap();
        let items: Vec<_> = find_children(doc.root_element(), "record").collect();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_element_children_skips_text() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_child_text() {
        let xml = r#"<dc><urn>  urn:lex:br  </urn><empty/></dc>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(child_text(root, "urn"), Some("urn:lex:br".to_string()));
        assert_eq!(child_text(root, "empty"), Some(String::new()));
        assert_eq!(child_text(root, "missing"), None);
    }

    #[test]
    fn test_elements_at_depth() {
        let xml = r#"<r><records><record><data><dc>1</dc></data></record><record><data><dc>2</dc></data></record></records></r>"#;
        let doc = Document::parse(xml).unwrap();
        let items = elements_at_depth(doc.root_element(), 5);

        let texts: Vec<_> = items.into_iter().map(get_text).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_elements_at_depth_too_deep() {
        let xml = r#"<a><b/></a>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(elements_at_depth(doc.root_element(), 4).is_empty());
        assert_eq!(elements_at_depth(doc.root_element(), 1).len(), 1);
    }
}
