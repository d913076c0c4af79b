use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref REG_ELEMENT_NAME: Regex = Regex::new(r"^[_:\w][_:\w\-.\d]*").unwrap();
    static ref REG_ATTRIBUTE_NAME: Regex =
        Regex::new(r#"^[^\s"'></=\x00-\x0F\x7F\x80-\x9F]+"#).unwrap();
    static ref REG_UNQUOTED_VALUE: Regex = Regex::new(r#"^[^\s"'`=<>]+"#).unwrap();
}

/// The start tag of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// offset of `<`
    pub start: usize,
    /// offset after `>`, or where scanning stopped for an unclosed tag
    pub end: usize,
    /// in source order
    pub attributes: Vec<ElementAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAttribute {
    pub name: String,
    /// Without quotes, `None` when the attribute has no `=`
    pub value: Option<String>,
    /// start offset of attribute name
    pub offset: usize,
    /// start offset of the value, after any opening quote
    pub value_offset: usize,
    /// end offset of the value, before any closing quote
    pub value_end: usize,
}

impl ElementAttribute {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    fn name_is(&self, name: &str, ignore_case: bool) -> bool {
        if ignore_case {
            self.name.eq_ignore_ascii_case(name)
        } else {
            self.name == name
        }
    }
}

impl Element {
    pub fn get_attribute(&self, name: &str, ignore_case: bool) -> Option<&ElementAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.name_is(name, ignore_case))
    }

    pub fn has_attribute(&self, name: &str, ignore_case: bool) -> bool {
        self.get_attribute(name, ignore_case).is_some()
    }

    pub fn attribute_index(&self, name: &str, ignore_case: bool) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.name_is(name, ignore_case))
    }

    /// Whether `class_name` is one of the space separated names of the `class` attribute
    pub fn has_class(&self, class_name: &str) -> bool {
        self.get_attribute("class", true)
            .is_some_and(|attr| attr.value().split(' ').any(|name| name == class_name))
    }

    /// The attribute whose value contains `offset`, edges included
    pub fn attribute_value_at(&self, offset: usize) -> Option<&ElementAttribute> {
        self.attributes.iter().find(|attr| {
            attr.value.is_some() && attr.value_offset <= offset && offset <= attr.value_end
        })
    }
}

/// Collect the start tags of `text`, comments are skipped
pub fn scan_elements(text: &str) -> Vec<Element> {
    let mut elements = vec![];
    let mut pos = 0;

    while let Some(found) = text[pos..].find('<') {
        let start = pos + found;
        let rest = &text[start..];

        if rest.starts_with("<!--") {
            pos = match text[start + 4..].find("-->") {
                Some(end) => start + 4 + end + 3,
                None => text.len(),
            };
            continue;
        }

        match REG_ELEMENT_NAME.find(&rest[1..]) {
            Some(name) => {
                let element = scan_start_tag(text, start, name.as_str());
                pos = element.end.max(start + 1);
                elements.push(element);
            }
            None => pos = start + 1,
        }
    }

    elements
}

/// The element whose start tag contains `offset`
pub fn element_at(text: &str, offset: usize) -> Option<Element> {
    scan_elements(text)
        .into_iter()
        .find(|element| element.start < offset && offset <= element.end)
}

fn scan_start_tag(text: &str, start: usize, name: &str) -> Element {
    let mut attributes = vec![];
    let mut pos = start + 1 + name.len();

    let end = loop {
        pos = skip_whitespace(text, pos);
        let rest = &text[pos..];
        if rest.is_empty() || rest.starts_with('<') {
            break pos;
        }
        if rest.starts_with("/>") {
            break pos + 2;
        }
        if rest.starts_with('>') {
            break pos + 1;
        }

        let Some(attr_name) = REG_ATTRIBUTE_NAME.find(rest) else {
            // stray character such as a lone '/', '=' or quote
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };
        let offset = pos;
        pos += attr_name.end();

        let after_name = skip_whitespace(text, pos);
        if !text[after_name..].starts_with('=') {
            attributes.push(ElementAttribute {
                name: attr_name.as_str().to_string(),
                value: None,
                offset,
                value_offset: pos,
                value_end: pos,
            });
            continue;
        }

        pos = skip_whitespace(text, after_name + 1);
        let rest = &text[pos..];
        let (value_offset, value_end, next) = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let value_offset = pos + 1;
                match text[value_offset..].find(quote) {
                    Some(len) => (value_offset, value_offset + len, value_offset + len + 1),
                    None => (value_offset, text.len(), text.len()),
                }
            }
            _ => {
                let len = REG_UNQUOTED_VALUE.find(rest).map_or(0, |m| m.end());
                (pos, pos + len, pos + len)
            }
        };
        attributes.push(ElementAttribute {
            name: attr_name.as_str().to_string(),
            value: Some(text[value_offset..value_end].to_string()),
            offset,
            value_offset,
            value_end,
        });
        pos = next;
    };

    Element {
        name: name.to_string(),
        start,
        end,
        attributes,
    }
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_in_order() {
        let elements = scan_elements(r#"<link rel="logo" type='image/png' async data-x=1>"#);
        assert_eq!(elements.len(), 1);
        let link = &elements[0];
        assert_eq!(link.name, "link");
        let names: Vec<&str> = link.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["rel", "type", "async", "data-x"]);
        assert_eq!(link.attributes[0].value(), "logo");
        assert_eq!(link.attributes[0].value_offset, 11);
        assert_eq!(link.attributes[1].value(), "image/png");
        assert_eq!(link.attributes[2].value, None);
        assert_eq!(link.attributes[3].value(), "1");
        assert_eq!(link.end, 49);
    }

    #[test]
    fn comments_and_end_tags_are_skipped() {
        let elements = scan_elements("<div><!-- <p class=x> --></div><br/>");
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["div", "br"]);
    }

    #[test]
    fn unterminated_quote_runs_to_the_end() {
        let text = r#"<meta http-equiv="refresh" content="<div>"#;
        let elements = scan_elements(text);
        assert_eq!(elements[0].name, "meta");
        let content = elements[0].get_attribute("content", true);
        assert_eq!(content.map(|a| a.value()), Some("<div>"));
    }

    #[test]
    fn lookups() {
        let element = &scan_elements(r##"<a CLASS="btn primary" href="#">"##)[0];
        assert!(element.has_attribute("class", true));
        assert!(!element.has_attribute("class", false));
        assert!(element.has_class("primary"));
        assert!(!element.has_class("prim"));
        assert_eq!(element.attribute_index("href", true), Some(1));
        assert_eq!(
            element.attribute_value_at(10).map(|a| a.name.as_str()),
            Some("CLASS")
        );
        assert!(element.attribute_value_at(2).is_none());
    }

    #[test]
    fn element_under_cursor() {
        let text = r#"<p></p><meta http-equiv="refresh" content="">"#;
        let element = element_at(text, 43).unwrap();
        assert_eq!(element.name, "meta");
        assert!(element_at(text, 4).is_none());
    }
}
