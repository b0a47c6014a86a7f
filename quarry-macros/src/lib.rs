mod decode_column;
mod decode_expression;
mod decode_table;

use decode_column::{ColumnMetadata, decode_column};
use decode_expression::decode_expression;
use decode_table::decode_table;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Error, Expr, ItemStruct, LitStr, Result, parse_macro_input};

/// Derive `::quarry::Entity` for a struct with named fields.
///
/// ```rust,ignore
/// #[derive(Entity)]
/// #[quarry(name = "people")]
/// struct Person {
///     #[quarry(primary_key, generated)]
///     id: i32,
///     #[quarry(name = "full_name", db_type = VarChar)]
///     name: String,
///     born: Option<time::Date>,
///     #[quarry(skip)]
///     cached: u32,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match entity(&item) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn entity(item: &ItemStruct) -> Result<proc_macro2::TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Entity cannot be derived for a generic struct",
        ));
    }
    let syn::Fields::Named(..) = item.fields else {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity can only be derived for a struct with named fields",
        ));
    };
    let name = &item.ident;
    let table = decode_table(item)?;
    let columns = item
        .fields
        .iter()
        .map(decode_column)
        .collect::<Result<Vec<_>>>()?;
    let table_name = LitStr::new(&table.name, Span::call_site());
    let column_defs = columns.iter().map(column_def);
    let row = columns.iter().map(|c| {
        let ident = &c.ident;
        quote! { ::quarry::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)) }
    });
    let from_values = columns.iter().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let field = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            #ident: ::quarry::materialize_field::<#ty>(
                #field,
                ::std::option::Option::unwrap_or_default(values.next()),
            )?
        }
    });
    let field_exprs = columns.iter().map(|c| {
        let ident = &c.ident;
        let field = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            pub const #ident: ::quarry::Expr =
                ::quarry::Expr::MemberAccess(::std::borrow::Cow::Borrowed(#field));
        }
    });
    Ok(quote! {
        impl ::quarry::Entity for #name {
            fn table() -> &'static ::quarry::TableRef {
                static TABLE: ::quarry::TableRef = ::quarry::TableRef {
                    name: #table_name,
                    columns: &[#(#column_defs),*],
                };
                &TABLE
            }

            fn row(&self) -> ::quarry::Row {
                ::std::vec![#(#row),*].into_boxed_slice()
            }

            fn from_values(values: ::quarry::Row) -> ::quarry::Result<Self> {
                let mut values = ::std::iter::IntoIterator::into_iter(::std::vec::Vec::from(values));
                ::std::result::Result::Ok(Self {
                    #(#from_values,)*
                })
            }
        }

        #[allow(non_upper_case_globals)]
        impl #name {
            #(#field_exprs)*
        }
    })
}

fn column_def(column: &ColumnMetadata) -> proc_macro2::TokenStream {
    let field = LitStr::new(&column.ident.to_string(), column.ident.span());
    let name = LitStr::new(&column.name, column.ident.span());
    let db_type = match &column.db_type {
        Some(v) => quote! { ::std::option::Option::Some(::quarry::DbType::#v) },
        None => quote! { ::std::option::Option::None },
    };
    let primary_key = column.primary_key;
    let generated = column.generated;
    let nullable = column.nullable;
    let mapped = column.mapped;
    quote! {
        ::quarry::ColumnDef {
            field: #field,
            name: #name,
            db_type: #db_type,
            primary_key: #primary_key,
            generated: #generated,
            nullable: #nullable,
            mapped: #mapped,
        }
    }
}

/// Build an `::quarry::Expr` from Rust operator syntax.
///
/// ```rust,ignore
/// let adults = Person::query().filter(expr!(Person::age >= 18 && Person::name != None));
/// ```
#[proc_macro]
pub fn expr(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Expr);
    match decode_expression(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
