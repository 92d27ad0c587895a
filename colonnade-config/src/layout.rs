use knuffel::errors::DecodeError;

use crate::utils::{expect_only_children, parse_arg_node};
use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Layout {
    #[knuffel(child, unwrap(argument), default = FloatOrInt(16.))]
    pub gaps: FloatOrInt<0, 65535>,
    #[knuffel(child)]
    pub default_column_width: Option<DefaultColumnWidth>,
    #[knuffel(child, unwrap(argument), default)]
    pub new_column_placement: NewColumnPlacement,
    #[knuffel(child, default)]
    pub struts: Struts,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            gaps: FloatOrInt(16.),
            default_column_width: None,
            new_column_placement: NewColumnPlacement::default(),
            struts: Struts::default(),
        }
    }
}

#[derive(knuffel::DecodeScalar, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum NewColumnPlacement {
    /// A new window's column goes right after the column of the nearest preceding window in the
    /// client list, falling back to after the active column.
    #[default]
    NextToPredecessor,
    /// A new window's column always goes right after the active column.
    AfterActive,
}

/// Width of a new column, as a proportion of the monitor width.
///
/// An empty node (`default-column-width {}`) leaves the choice to the built-in default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultColumnWidth(pub Option<f64>);

impl<S> knuffel::Decode<S> for DefaultColumnWidth
where
    S: knuffel::traits::ErrorSpan,
{
    fn decode_node(
        node: &knuffel::ast::SpannedNode<S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        expect_only_children(node, ctx);

        let mut children = node.children();

        let Some(child) = children.next() else {
            return Ok(Self(None));
        };

        if let Some(unwanted_child) = children.next() {
            ctx.emit_error(DecodeError::unexpected(
                unwanted_child,
                "node",
                "expected no more than one child",
            ));
        }

        match &**child.node_name {
            "proportion" => {
                let value: FloatOrInt<0, 1> = parse_arg_node("proportion", child, ctx)?;
                if value.0 <= 0. {
                    ctx.emit_error(DecodeError::conversion(
                        child,
                        "proportion must be greater than 0",
                    ));
                    return Ok(Self(None));
                }
                Ok(Self(Some(value.0)))
            }
            name => {
                ctx.emit_error(DecodeError::unexpected(
                    child,
                    "node",
                    format!("unexpected node `{}`, expected `proportion`", name.escape_default()),
                ));
                Ok(Self(None))
            }
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq)]
pub struct Struts {
    #[knuffel(child, unwrap(argument), default)]
    pub left: FloatOrInt<-65535, 65535>,
    #[knuffel(child, unwrap(argument), default)]
    pub right: FloatOrInt<-65535, 65535>,
    #[knuffel(child, unwrap(argument), default)]
    pub top: FloatOrInt<-65535, 65535>,
    #[knuffel(child, unwrap(argument), default)]
    pub bottom: FloatOrInt<-65535, 65535>,
}
