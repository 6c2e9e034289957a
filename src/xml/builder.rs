use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use quick_xml::escape::partial_escape;
use rust_decimal::Decimal;

const INDENT: &str = "  ";

/// Value of one element in an [`ElementTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlField {
    /// Omitted from the output entirely.
    Absent,
    /// Text content, escaped on render.
    Scalar(String),
    /// Rendered as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Child elements, rendered one level deeper.
    Tree(ElementTree),
}

impl From<&str> for XmlField {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for XmlField {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for XmlField {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<bool> for XmlField {
    fn from(value: bool) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Decimal> for XmlField {
    fn from(value: Decimal) -> Self {
        Self::Scalar(value.to_string())
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {
        $(impl From<$ty> for XmlField {
            fn from(value: $ty) -> Self {
                Self::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from_number!(u8, u16, u32, u64, i32, i64, f64);

impl From<NaiveDate> for XmlField {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for XmlField {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value.date())
    }
}

/// The calendar date in the value's own offset; no conversion to UTC.
impl<Tz: TimeZone> From<DateTime<Tz>> for XmlField {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Date(value.date_naive())
    }
}

impl From<ElementTree> for XmlField {
    fn from(value: ElementTree) -> Self {
        Self::Tree(value)
    }
}

impl<T: Into<XmlField>> From<Option<T>> for XmlField {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Ordered list of `(name, value)` pairs rendered as sibling elements.
///
/// ```
/// use szamla_agent::xml::{ElementTree, render};
///
/// let tree = ElementTree::new()
///     .with("szamlaszam", "E-2024-1")
///     .with("rendelesSzam", None::<&str>)
///     .with("pdf", false);
///
/// assert_eq!(
///     render(&tree, 0),
///     "<szamlaszam>E-2024-1</szamlaszam>\n<pdf>false</pdf>\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementTree {
    elements: Vec<(String, XmlField)>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return the tree (chaining form of [`push`](Self::push)).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<XmlField>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<XmlField>) {
        self.elements.push((name.into(), value.into()));
    }

    /// Append every element of `other`, keeping its order.
    pub fn append(&mut self, other: ElementTree) {
        self.elements.extend(other.elements);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlField)> {
        self.elements.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Something that renders itself as an XML fragment at a given indent level.
///
/// Invoice models implement this to be passed to
/// [`Client::issue_invoice`](crate::agent::Client::issue_invoice).
/// The returned string is inserted verbatim into the request document.
pub trait XmlFragment {
    fn to_xml(&self, indent: usize) -> String;
}

impl XmlFragment for ElementTree {
    fn to_xml(&self, indent: usize) -> String {
        render(self, indent)
    }
}

impl<T: XmlFragment + ?Sized> XmlFragment for &T {
    fn to_xml(&self, indent: usize) -> String {
        (**self).to_xml(indent)
    }
}

/// Render `tree` as newline-terminated elements starting at `base_indent`
/// (two spaces per level). Absent values produce no output.
///
/// Output is a fragment spliced under a fixed preamble at an arbitrary
/// depth, so it is written directly instead of through `quick_xml::Writer`;
/// text still goes through quick-xml's escaping.
pub fn render(tree: &ElementTree, base_indent: usize) -> String {
    let mut out = String::new();
    render_into(&mut out, tree, base_indent);
    out
}

fn render_into(out: &mut String, tree: &ElementTree, indent: usize) {
    let pad = INDENT.repeat(indent);
    for (name, value) in &tree.elements {
        match value {
            XmlField::Absent => {}
            XmlField::Scalar(text) => {
                out.push_str(&format!("{pad}<{name}>{}</{name}>\n", partial_escape(text)));
            }
            XmlField::Date(date) => {
                out.push_str(&format!("{pad}<{name}>{}</{name}>\n", format_date(*date)));
            }
            XmlField::Tree(children) => {
                out.push_str(&format!("{pad}<{name}>\n"));
                render_into(out, children, indent + 1);
                out.push_str(&format!("{pad}</{name}>\n"));
            }
        }
    }
}

/// Zero-padded `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
