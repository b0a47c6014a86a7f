use quote::ToTokens;
use syn::{
    Error, Field, GenericArgument, Ident, LitStr, PathArguments, Result, Type, TypePath,
    parse::ParseBuffer, spanned::Spanned,
};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) db_type: Option<Ident>,
    pub(crate) primary_key: bool,
    pub(crate) generated: bool,
    pub(crate) nullable: bool,
    pub(crate) mapped: bool,
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };
    let Some(last) = path.segments.last() else {
        return false;
    };
    last.ident == "Option"
        && matches!(
            &last.arguments,
            PathArguments::AngleBracketed(args)
                if args.args.len() == 1 && matches!(args.args[0], GenericArgument::Type(..))
        )
}

fn flag(arg: &syn::meta::ParseNestedMeta, name: &str) -> Result<()> {
    if arg.input.peek(syn::Token![=]) {
        return Err(arg.error(format!(
            "Error while parsing `{name}`, use it like: `#[quarry({name})]`"
        )));
    }
    Ok(())
}

pub fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new(
            field.span(),
            "Entity fields are expected to have a name",
        ));
    };
    let optional = is_option(&field.ty);
    let mut metadata = ColumnMetadata {
        name: ident.to_string().to_lowercase(),
        ident,
        ty: field.ty.clone(),
        db_type: None,
        primary_key: false,
        generated: false,
        nullable: optional,
        mapped: true,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    return Err(arg.error(
                        "Error while parsing `name`, use it like: `#[quarry(name = \"my_column\")]`",
                    ));
                };
                metadata.name = v.value();
            } else if arg.path.is_ident("db_type") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Ident>) else {
                    return Err(arg.error(
                        "Error while parsing `db_type`, use it like: `#[quarry(db_type = VarChar)]`",
                    ));
                };
                metadata.db_type = Some(v);
            } else if arg.path.is_ident("primary_key") {
                flag(&arg, "primary_key")?;
                metadata.primary_key = true;
                metadata.nullable = false;
            } else if arg.path.is_ident("generated") {
                flag(&arg, "generated")?;
                metadata.generated = true;
            } else if arg.path.is_ident("nullable") {
                flag(&arg, "nullable")?;
                metadata.nullable = true;
            } else if arg.path.is_ident("skip") {
                flag(&arg, "skip")?;
                metadata.mapped = false;
            } else {
                return Err(arg.error(format!(
                    "Unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                )));
            }
            Ok(())
        })?;
    }
    Ok(metadata)
}
