use knuffel::errors::DecodeError;

/// Number that can be written either as an integer or as a decimal in the config.
// MIN and MAX generics are only used during parsing to check the value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatOrInt<const MIN: i32, const MAX: i32>(pub f64);

impl<const MIN: i32, const MAX: i32> FloatOrInt<MIN, MAX> {
    /// Rounds the value to whole logical pixels.
    pub fn round(self) -> i32 {
        // The range check during parsing keeps this within i32.
        self.0.round() as i32
    }

    fn check_range<S: knuffel::traits::ErrorSpan>(
        value: f64,
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Self {
        if (f64::from(MIN)..=f64::from(MAX)).contains(&value) {
            FloatOrInt(value)
        } else {
            ctx.emit_error(DecodeError::conversion(
                val,
                format!("value must be between {MIN} and {MAX}"),
            ));
            FloatOrInt::default()
        }
    }
}

impl<S: knuffel::traits::ErrorSpan, const MIN: i32, const MAX: i32> knuffel::DecodeScalar<S>
    for FloatOrInt<MIN, MAX>
{
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::Int(ref value) => match i32::try_from(value) {
                Ok(v) => Ok(Self::check_range(f64::from(v), val, ctx)),
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    Ok(FloatOrInt::default())
                }
            },
            knuffel::ast::Literal::Decimal(ref value) => match f64::try_from(value) {
                Ok(v) => Ok(Self::check_range(v, val, ctx)),
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    Ok(FloatOrInt::default())
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "Unsupported value, only numbers are recognized",
                ));
                Ok(FloatOrInt::default())
            }
        }
    }
}

/// Reports arguments and properties on a node that only takes children.
pub fn expect_only_children<S: knuffel::traits::ErrorSpan>(
    node: &knuffel::ast::SpannedNode<S>,
    ctx: &mut knuffel::decode::Context<S>,
) {
    for val in &node.arguments {
        ctx.emit_error(DecodeError::unexpected(
            &val.literal,
            "argument",
            "only child nodes are expected here",
        ));
    }

    for name in node.properties.keys() {
        ctx.emit_error(DecodeError::unexpected(
            name,
            "property",
            "only child nodes are expected here",
        ));
    }
}

/// Decodes a node that carries exactly one scalar argument and nothing else.
pub fn parse_arg_node<S: knuffel::traits::ErrorSpan, T: knuffel::traits::DecodeScalar<S>>(
    name: &str,
    node: &knuffel::ast::SpannedNode<S>,
    ctx: &mut knuffel::decode::Context<S>,
) -> Result<T, DecodeError<S>> {
    let [val, extra @ ..] = &node.arguments[..] else {
        return Err(DecodeError::missing(
            node,
            format!("`{name}` needs a value"),
        ));
    };

    if let Some(extra) = extra.first() {
        ctx.emit_error(DecodeError::unexpected(
            &extra.literal,
            "argument",
            format!("`{name}` takes a single value"),
        ));
    }

    if !node.properties.is_empty() || node.children.is_some() {
        ctx.emit_error(DecodeError::unexpected(
            node,
            "node",
            format!("`{name}` takes nothing but its value"),
        ));
    }

    knuffel::traits::DecodeScalar::decode(val, ctx)
}
