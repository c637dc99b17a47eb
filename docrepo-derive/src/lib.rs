//! # docrepo Derive Macros
//!
//! Procedural macros for deriving docrepo traits automatically.
//!
//! ## `Entity`
//!
//! Derives the `Entity` trait for structs with named fields, marking them
//! as storable in a typed repository. The struct must also derive serde's
//! `Serialize` and `Deserialize`.
//!
//! - **Container attribute**: `#[entity(collection = "...")]` overrides the
//!   collection name (defaults to the struct name)
//! - `#[entity(id = "...")]` / `#[entity(created_at = "...")]` name the
//!   identity fields when they are not literally `id` / `created_at`
//!
//! # Examples
//!
//! ```rust,ignore
//! use docrepo_derive::Entity;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Entity, Serialize, Deserialize)]
//! #[entity(collection = "books")]
//! pub struct Book {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     pub id: Option<bson::oid::ObjectId>,
//!     pub created_at: bson::DateTime,
//!     pub title: String,
//! }
//! ```
//!
//! The identifier field must be `Option<ObjectId>` serialized as `_id`, and
//! the creation timestamp a `bson::DateTime`; mismatches surface as compile
//! errors in the generated impl.

extern crate proc_macro;
mod entity;

use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

use crate::entity::generate_entity_for_struct;

/// Derives the `Entity` trait for repository persistence.
///
/// # Supported Types
///
/// - Structs with named fields only
/// - Enums, unions, and tuple structs are not supported
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum, union, or tuple struct
/// - A named identity field does not exist on the struct
/// - An unknown `#[entity(...)]` attribute is used
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new_spanned(
                    &ast,
                    format!(
                        "Failed to derive Entity for struct '{}': {}.\n\
                         Only structs with named fields are supported.\n\
                         Example: #[derive(Entity)] pub struct MyEntity {{ id: Option<ObjectId>, created_at: DateTime }}",
                        ast.ident, e
                    ),
                );
                error.to_compile_error().into()
            }
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for enums. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for unions. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
    }
}
