//! The structured records exchanged with the harness contract.
//!
//! None of these is a distinct wire type; each is a conventional shape of [`TypedValue`] agreed
//! between the contract and this crate. Conversions from `TypedValue` never fail: fields which
//! are absent or of the wrong type take placeholder values.

use std::fmt::{self, Display, Formatter};

use types::TypedValue;

const ID_KEY: &str = "id";
const NAME_KEY: &str = "name";
const TAGS_KEY: &str = "tags";
const DEPTH_KEY: &str = "depth";
const WIDTH_KEY: &str = "width";
const NESTED_KEY: &str = "nested";

/// Prefixes every line of `text` with `spaces` spaces.
pub(crate) fn indent(text: &str, spaces: usize) -> String {
    let padding = " ".repeat(spaces);
    text.lines()
        .map(|line| format!("{}{}", padding, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Map{ id: U32, name: String, tags: Vector<Symbol> }`.
///
/// Displays on one line by default, e.g. `User { id: 1, name: "Fifo", tags: [dev, sdk] }`, and
/// as a block with the alternate flag (`{:#}`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub tags: Vec<String>,
}

impl User {
    /// `User { id: 1, name: "Fifo", tags: [dev, sdk] }`.
    pub fn canonical() -> Self {
        User {
            id: 1,
            name: "Fifo".to_string(),
            tags: vec!["dev".to_string(), "sdk".to_string()],
        }
    }

    pub fn to_typed_value(&self) -> TypedValue {
        TypedValue::symbol_map(vec![
            (ID_KEY, TypedValue::U32(self.id)),
            (NAME_KEY, TypedValue::String(self.name.clone())),
            (
                TAGS_KEY,
                TypedValue::Vector(self.tags.iter().map(|tag| TypedValue::symbol(tag)).collect()),
            ),
        ])
    }

    pub fn from_typed_value(value: &TypedValue) -> Self {
        let tags = value
            .get(TAGS_KEY)
            .and_then(TypedValue::as_vector)
            .map(|tags| {
                tags.iter()
                    .map(|tag| tag.as_symbol().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default();

        User {
            id: value.get(ID_KEY).and_then(TypedValue::as_u32).unwrap_or(0),
            name: value
                .get(NAME_KEY)
                .and_then(TypedValue::as_string)
                .unwrap_or_default()
                .to_string(),
            tags,
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let tags = self.tags.join(", ");
        if f.alternate() {
            write!(
                f,
                "User {{\n  id: {},\n  name: \"{}\",\n  tags: [{}]\n}}",
                self.id, self.name, tags
            )
        } else {
            write!(
                f,
                "User {{ id: {}, name: \"{}\", tags: [{}] }}",
                self.id, self.name, tags
            )
        }
    }
}

/// `Vector[ Symbol(variant), U32(payload) ]`, a tagged enum with a single payload field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Choice {
    pub variant: String,
    pub payload: u32,
}

impl Choice {
    /// `Choice::Count(9)`.
    pub fn canonical() -> Self {
        Choice {
            variant: "Count".to_string(),
            payload: 9,
        }
    }

    pub fn to_typed_value(&self) -> TypedValue {
        TypedValue::Vector(vec![
            TypedValue::symbol(&self.variant),
            TypedValue::U32(self.payload),
        ])
    }

    /// Returns `None` unless `value` is a vector of at least two elements.
    pub fn from_typed_value(value: &TypedValue) -> Option<Self> {
        match value.as_vector()? {
            [variant, payload, ..] => Some(Choice {
                variant: variant.as_symbol().unwrap_or_default().to_string(),
                payload: payload.as_u32().unwrap_or(0),
            }),
            _ => None,
        }
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Choice::{}({})", self.variant, self.payload)
    }
}

/// `Map{ depth: U32, width: U32, nested: Vector<NestedType> }`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NestedType {
    pub depth: u32,
    pub width: u32,
    pub nested: Vec<NestedType>,
}

impl NestedType {
    /// Builds a complete tree: `width` children per node until `depth` reaches zero.
    ///
    /// The tree has `width^depth` leaves; callers are expected to keep both small. A zero
    /// `width` yields a single node whatever the depth.
    pub fn build(depth: u32, width: u32) -> Self {
        let nested = if depth == 0 || width == 0 {
            Vec::new()
        } else {
            let child = NestedType::build(depth - 1, width);
            vec![child; width as usize]
        };
        NestedType {
            depth,
            width,
            nested,
        }
    }

    /// Returns `width^depth`, the number of leaves [`build`](NestedType::build) would create, or
    /// `None` if that overflows a `u64`.
    pub fn leaf_count(depth: u32, width: u32) -> Option<u64> {
        u64::from(width).checked_pow(depth)
    }

    pub fn to_typed_value(&self) -> TypedValue {
        TypedValue::symbol_map(vec![
            (DEPTH_KEY, TypedValue::U32(self.depth)),
            (WIDTH_KEY, TypedValue::U32(self.width)),
            (
                NESTED_KEY,
                TypedValue::Vector(self.nested.iter().map(NestedType::to_typed_value).collect()),
            ),
        ])
    }

    pub fn from_typed_value(value: &TypedValue) -> Self {
        NestedType {
            depth: value.get(DEPTH_KEY).and_then(TypedValue::as_u32).unwrap_or(0),
            width: value.get(WIDTH_KEY).and_then(TypedValue::as_u32).unwrap_or(0),
            nested: value
                .get(NESTED_KEY)
                .and_then(TypedValue::as_vector)
                .map(|children| children.iter().map(NestedType::from_typed_value).collect())
                .unwrap_or_default(),
        }
    }
}

impl Display for NestedType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "NestedType {{\n  depth: {},\n  width: {},\n  nested: ",
            self.depth, self.width
        )?;
        if self.nested.is_empty() {
            write!(f, "[]")?;
        } else {
            let children = self
                .nested
                .iter()
                .map(|child| indent(&child.to_string(), 4))
                .collect::<Vec<_>>()
                .join(",\n");
            write!(f, "[\n{}\n  ]", children)?;
        }
        write!(f, "\n}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_canonical_user() {
        let user = User::canonical();
        assert_eq!(User::from_typed_value(&user.to_typed_value()), user);
    }

    #[test]
    fn should_display_user_inline_and_as_block() {
        let user = User::canonical();
        assert_eq!(
            user.to_string(),
            "User { id: 1, name: \"Fifo\", tags: [dev, sdk] }"
        );
        assert_eq!(
            format!("{:#}", user),
            "User {\n  id: 1,\n  name: \"Fifo\",\n  tags: [dev, sdk]\n}"
        );
    }

    #[test]
    fn should_use_placeholders_for_malformed_user() {
        let user = User::from_typed_value(&TypedValue::symbol_map(vec![(
            "id",
            TypedValue::string("one"),
        )]));
        assert_eq!(
            user,
            User {
                id: 0,
                name: String::new(),
                tags: Vec::new()
            }
        );
        assert_eq!(User::from_typed_value(&TypedValue::Void).id, 0);
    }

    #[test]
    fn should_require_two_elements_for_choice() {
        let choice = Choice::canonical();
        assert_eq!(Choice::from_typed_value(&choice.to_typed_value()), Some(choice));
        assert_eq!(
            Choice::from_typed_value(&TypedValue::Vector(vec![TypedValue::symbol("Count")])),
            None
        );
        assert_eq!(Choice::from_typed_value(&TypedValue::U32(9)), None);
        assert_eq!(Choice::canonical().to_string(), "Choice::Count(9)");
    }

    #[test]
    fn should_build_complete_trees() {
        let tree = NestedType::build(2, 3);
        assert_eq!(tree.nested.len(), 3);
        assert!(tree.nested.iter().all(|child| child.depth == 1));
        assert!(tree.nested.iter().all(|child| child.nested.len() == 3));

        assert!(NestedType::build(0, 5).nested.is_empty());
        assert!(NestedType::build(3, 0).nested.is_empty());

        let single_node = NestedType::build(1_000_000, 0);
        assert_eq!(single_node.depth, 1_000_000);
        assert!(single_node.nested.is_empty());
    }

    #[test]
    fn should_count_leaves() {
        assert_eq!(NestedType::leaf_count(2, 3), Some(9));
        assert_eq!(NestedType::leaf_count(0, 7), Some(1));
        assert_eq!(NestedType::leaf_count(64, 2), None);
    }

    #[test]
    fn should_render_nested_children_indented() {
        let expected = "NestedType {\n  depth: 1,\n  width: 1,\n  nested: [\n    NestedType {\n      \
                        depth: 0,\n      width: 1,\n      nested: []\n    }\n  ]\n}";
        assert_eq!(NestedType::build(1, 1).to_string(), expected);
    }

    #[test]
    fn should_indent_every_line() {
        assert_eq!(indent("a\nb", 2), "  a\n  b");
    }
}
