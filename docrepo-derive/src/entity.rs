use proc_macro::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, LitStr, Result};

pub(crate) fn generate_entity_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let fields = match &data.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "Entity can only be derived for structs with named fields",
            ));
        }
    };

    let mut collection_name = name.to_string();
    let mut id_field = "id".to_string();
    let mut created_at_field = "created_at".to_string();

    for attr in &ast.attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    collection_name = s.value();
                    Ok(())
                } else if meta.path.is_ident("id") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    id_field = s.value();
                    Ok(())
                } else if meta.path.is_ident("created_at") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    created_at_field = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown entity attribute"))
                }
            })?
        }
    }

    let find_field = |field_name: &str| {
        fields
            .named
            .iter()
            .find(|field| {
                field
                    .ident
                    .as_ref()
                    .is_some_and(|ident| ident == field_name)
            })
            .and_then(|field| field.ident.clone())
    };

    let id_ident = find_field(&id_field).ok_or_else(|| {
        syn::Error::new_spanned(ast, format!("Field {} not found in struct", id_field))
    })?;
    let created_at_ident = find_field(&created_at_field).ok_or_else(|| {
        syn::Error::new_spanned(
            ast,
            format!("Field {} not found in struct", created_at_field),
        )
    })?;

    let gen = quote! {
        impl #impl_generics docrepo::Entity for #name #ty_generics #where_clause {
            fn collection_name() -> &'static str {
                #collection_name
            }

            fn id(&self) -> Option<docrepo::bson::oid::ObjectId> {
                self.#id_ident
            }

            fn set_id(&mut self, id: docrepo::bson::oid::ObjectId) {
                self.#id_ident = Some(id);
            }

            fn created_at(&self) -> docrepo::bson::DateTime {
                self.#created_at_ident
            }

            fn set_created_at(&mut self, created_at: docrepo::bson::DateTime) {
                self.#created_at_ident = created_at;
            }
        }
    };

    Ok(TokenStream::from(gen))
}
