use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{BinOp, Error, Expr, ExprPath, Result, UnOp, spanned::Spanned};

/// Translate Rust operator syntax into an `::quarry::Expr` constructor.
///
/// Only logical and comparison operators are accepted, everything that is not an operator is
/// an operand and goes through `IntoExpr`.
pub fn decode_expression(expr: &Expr) -> Result<TokenStream> {
    Ok(match expr {
        Expr::Binary(v) => {
            let op = match v.op {
                BinOp::And(..) => quote! { ::quarry::BinaryOpType::And },
                BinOp::Or(..) => quote! { ::quarry::BinaryOpType::Or },
                BinOp::Eq(..) => quote! { ::quarry::BinaryOpType::Equal },
                BinOp::Ne(..) => quote! { ::quarry::BinaryOpType::NotEqual },
                BinOp::Lt(..) => quote! { ::quarry::BinaryOpType::Less },
                BinOp::Le(..) => quote! { ::quarry::BinaryOpType::LessEqual },
                BinOp::Gt(..) => quote! { ::quarry::BinaryOpType::Greater },
                BinOp::Ge(..) => quote! { ::quarry::BinaryOpType::GreaterEqual },
                _ => {
                    return Err(Error::new(
                        v.op.span(),
                        format!(
                            "Operator `{}` is not supported in a query expression",
                            v.op.to_token_stream()
                        ),
                    ));
                }
            };
            let lhs = decode_expression(&v.left)?;
            let rhs = decode_expression(&v.right)?;
            quote! { ::quarry::Expr::binary(#op, #lhs, #rhs) }
        }
        Expr::Unary(v) => match v.op {
            UnOp::Not(..) => {
                let arg = decode_expression(&v.expr)?;
                quote! { ::quarry::Expr::negate(#arg) }
            }
            _ => {
                return Err(Error::new(
                    v.op.span(),
                    format!(
                        "Operator `{}` is not supported in a query expression",
                        v.op.to_token_stream()
                    ),
                ));
            }
        },
        Expr::Paren(v) => decode_expression(&v.expr)?,
        Expr::Group(v) => decode_expression(&v.expr)?,
        Expr::Path(ExprPath { path, qself: None, .. }) if path.is_ident("None") => {
            quote! { ::quarry::Expr::Literal(::quarry::Value::Null) }
        }
        _ => quote! { ::quarry::IntoExpr::into_expr(::std::clone::Clone::clone(&(#expr))) },
    })
}
