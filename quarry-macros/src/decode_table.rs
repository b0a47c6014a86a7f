use syn::{ItemStruct, LitStr, Result, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) name: String,
}

/// Table name from `#[quarry(name = "..")]`, the struct name otherwise.
pub fn decode_table(item: &ItemStruct) -> Result<TableMetadata> {
    let mut metadata = TableMetadata {
        name: item.ident.to_string(),
    };
    for attr in &item.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    return Err(arg.error(
                        "Error while parsing `name`, use it like: `#[quarry(name = \"my_table\")]`",
                    ));
                };
                metadata.name = v.value();
                Ok(())
            } else {
                Err(arg.error("Only `name` is allowed on the struct inside quarry macro"))
            }
        })?;
    }
    Ok(metadata)
}
