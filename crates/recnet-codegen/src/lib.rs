// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive macros for `recnet::Message` and `recnet::MessageEnum`.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, LitStr,
    PathArguments, PathSegment, Type,
};

/// Rust types with a fixed-width wire scalar.
const SCALARS: &[&str] = &["bool", "i8", "i16", "i32", "i64", "f32", "f64"];

/// Primitive types with no wire representation.
const UNSUPPORTED_PRIMITIVES: &[&str] = &[
    "u8", "u16", "u32", "u64", "u128", "usize", "i128", "isize", "char", "str",
];

/// Wire classification of a struct field
enum Shape {
    Scalar(Type),
    String,
    Uuid,
    Bytes,
    /// Array of scalars (element type)
    Array(Type),
    Enum(Type),
    Message { inner: Type, boxed: bool },
    /// Array of messages (element type)
    Messages(Type),
}

struct FieldDef {
    ident: syn::Ident,
    name: String,
    shape: Shape,
    nullable: bool,
}

/// `#[derive(Message)]`: generates the schema and record conversions.
///
/// Field mapping:
/// - `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`: scalar
/// - `String`, `Uuid`, `Vec<u8>`: string, identifier, byte blob
/// - `Vec<scalar>`: scalar array
/// - `#[recnet(enumeration)] E`: enum (E implements `MessageEnum`)
/// - `T`, `Box<T>`: nested message (T implements `Message`)
/// - `Vec<T>`: array of messages
///
/// Every non-scalar field may be wrapped in `Option` to make it nullable.
/// `#[recnet(name = "...")]` on the struct overrides the schema name.
///
/// Example:
/// ```ignore
/// use recnet::Message;
///
/// #[derive(Message)]
/// struct ChatMessage {
///     username: String,
///     timestamp: i64,
///     message: Option<String>,
/// }
/// ```
#[proc_macro_derive(Message, attributes(recnet))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_message(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// `#[derive(MessageEnum)]`: ordinals follow declaration order.
///
/// Example:
/// ```ignore
/// use recnet::MessageEnum;
///
/// #[derive(MessageEnum)]
/// enum Status {
///     Unknown,
///     Active,
/// }
/// ```
#[proc_macro_derive(MessageEnum, attributes(recnet))]
pub fn derive_message_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_message_enum(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_message(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Message cannot be derived for generic types",
        ));
    }
    let schema_name = container_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only structs with named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let mut defs = Vec::new();
    for field in fields {
        let Some(field_ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let enumeration = field_is_enumeration(&field.attrs)?;
        let (shape, nullable) = classify(&field.ty, enumeration)?;
        let name = field_ident.to_string().trim_start_matches("r#").to_string();
        defs.push(FieldDef {
            ident: field_ident,
            name,
            shape,
            nullable,
        });
    }

    let schema_fields: Vec<_> = defs.iter().map(schema_field).collect();
    let to_values: Vec<_> = defs.iter().map(to_value).collect();
    let from_values: Vec<_> = defs
        .iter()
        .map(|def| {
            let field_ident = &def.ident;
            let name = &def.name;
            let convert = from_value(def);
            quote! {
                #field_ident: {
                    let v = values.take(#name)?;
                    #convert
                }
            }
        })
        .collect();

    Ok(quote! {
        impl ::recnet::Message for #ident {
            fn schema() -> ::std::sync::Arc<::recnet::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<::recnet::Schema>> =
                    ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        ::recnet::SchemaBuilder::new(#schema_name)
                            #(#schema_fields)*
                            .build()
                    })
                    .clone()
            }

            fn to_record(&self) -> ::recnet::Record {
                ::recnet::Record::from_parts(
                    <Self as ::recnet::Message>::schema(),
                    vec![#(#to_values),*],
                )
            }

            #[allow(unused_mut, unused_variables)]
            fn from_record(record: ::recnet::Record) -> ::recnet::Result<Self> {
                let mut values = ::recnet::message::FieldValues::new::<Self>(record)?;
                Ok(Self {
                    #(#from_values),*
                })
            }
        }
    })
}

fn expand_message_enum(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "MessageEnum cannot be derived for generic types",
        ));
    }
    let enum_name = container_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(input, "Only enums are supported"));
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(input, "Enum must have at least one variant"));
    }

    let mut variants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Only fieldless variants are supported",
            ));
        }
        variants.push(&variant.ident);
    }

    let names: Vec<_> = variants.iter().map(|v| v.to_string()).collect();
    let ordinals: Vec<u32> = (0..variants.len() as u32).collect();

    Ok(quote! {
        impl ::recnet::MessageEnum for #ident {
            fn enum_type() -> ::std::sync::Arc<::recnet::EnumType> {
                static TYPE: ::std::sync::OnceLock<::std::sync::Arc<::recnet::EnumType>> =
                    ::std::sync::OnceLock::new();
                TYPE.get_or_init(|| {
                    ::std::sync::Arc::new(::recnet::EnumType::new(#enum_name, [#(#names),*]))
                })
                .clone()
            }

            fn ordinal(&self) -> u32 {
                match self {
                    #(Self::#variants => #ordinals,)*
                }
            }

            fn from_ordinal(ordinal: u32) -> Option<Self> {
                match ordinal {
                    #(#ordinals => Some(Self::#variants),)*
                    _ => None,
                }
            }
        }
    })
}

/// `#[recnet(name = "...")]` on a struct or enum
fn container_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("recnet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

/// `#[recnet(enumeration)]` on a field
fn field_is_enumeration(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut enumeration = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("recnet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("enumeration") {
                enumeration = true;
                Ok(())
            } else {
                Err(meta.error("expected `enumeration`"))
            }
        })?;
    }
    Ok(enumeration)
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    }
}

/// `T` from `Wrapper<T>`
fn unwrap_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let segment = last_segment(ty)?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// Plain path type whose last segment is one of `names`
fn is_plain(ty: &Type, names: &[&str]) -> bool {
    last_segment(ty).is_some_and(|s| {
        s.arguments.is_none() && names.iter().any(|n| s.ident == n)
    })
}

fn classify(ty: &Type, enumeration: bool) -> syn::Result<(Shape, bool)> {
    let (inner, nullable) = match unwrap_generic(ty, "Option") {
        Some(inner) => (inner, true),
        None => (ty, false),
    };
    if unwrap_generic(inner, "Option").is_some() {
        return Err(syn::Error::new_spanned(ty, "Nested Option is not supported"));
    }

    if enumeration {
        return Ok((Shape::Enum(inner.clone()), nullable));
    }

    let shape = if is_plain(inner, SCALARS) {
        if nullable {
            return Err(syn::Error::new_spanned(
                ty,
                "Scalar fields cannot be null; remove the Option",
            ));
        }
        Shape::Scalar(inner.clone())
    } else if is_plain(inner, UNSUPPORTED_PRIMITIVES) {
        return Err(syn::Error::new_spanned(
            inner,
            "Unsupported primitive. Supported scalars: bool, i8, i16, i32, i64, f32, f64.",
        ));
    } else if is_plain(inner, &["String"]) {
        Shape::String
    } else if is_plain(inner, &["Uuid"]) {
        Shape::Uuid
    } else if let Some(elem) = unwrap_generic(inner, "Vec") {
        if is_plain(elem, &["u8"]) {
            Shape::Bytes
        } else if is_plain(elem, SCALARS) {
            Shape::Array(elem.clone())
        } else if is_message_type(elem) {
            Shape::Messages(elem.clone())
        } else {
            return Err(syn::Error::new_spanned(
                elem,
                "Unsupported Vec element. Supported: u8, scalars, Message types.",
            ));
        }
    } else if let Some(boxed) = unwrap_generic(inner, "Box") {
        if !is_message_type(boxed) {
            return Err(syn::Error::new_spanned(boxed, "Box must hold a Message type"));
        }
        Shape::Message {
            inner: boxed.clone(),
            boxed: true,
        }
    } else if is_message_type(inner) {
        Shape::Message {
            inner: inner.clone(),
            boxed: false,
        }
    } else {
        return Err(syn::Error::new_spanned(
            ty,
            "Unsupported field type. Supported: scalars, String, Uuid, Vec<u8>, Vec<scalar>, \
             Message types, Vec<Message>, Box<Message>, and Option of any non-scalar.",
        ));
    };
    Ok((shape, nullable))
}

/// A path type without generics that is not a known primitive
fn is_message_type(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|s| s.arguments.is_none())
        && !is_plain(ty, SCALARS)
        && !is_plain(ty, UNSUPPORTED_PRIMITIVES)
        && !is_plain(ty, &["String", "Uuid"])
}

fn schema_field(def: &FieldDef) -> TokenStream2 {
    let name = &def.name;
    let field_type = match &def.shape {
        Shape::Scalar(t) => {
            quote! { ::recnet::FieldType::Scalar(<#t as ::recnet::message::Scalar>::KIND) }
        }
        Shape::String => quote! { ::recnet::FieldType::String },
        Shape::Uuid => quote! { ::recnet::FieldType::Uuid },
        Shape::Bytes => quote! { ::recnet::FieldType::Bytes },
        Shape::Array(t) => {
            quote! { ::recnet::FieldType::Array(<#t as ::recnet::message::Scalar>::KIND) }
        }
        Shape::Enum(t) => {
            quote! { ::recnet::FieldType::Enum(<#t as ::recnet::MessageEnum>::enum_type()) }
        }
        // Lazy so a type may refer to itself without recursing here
        Shape::Message { inner, .. } => quote! {
            ::recnet::FieldType::Message(
                ::recnet::SchemaRef::Lazy(<#inner as ::recnet::Message>::schema)
            )
        },
        Shape::Messages(t) => quote! {
            ::recnet::FieldType::Messages(
                ::recnet::SchemaRef::Lazy(<#t as ::recnet::Message>::schema)
            )
        },
    };
    quote! { .field(#name, #field_type) }
}

fn to_value(def: &FieldDef) -> TokenStream2 {
    let field_ident = &def.ident;
    let value = match (&def.shape, def.nullable) {
        (Shape::Scalar(t), _) => quote! { <#t as ::recnet::message::Scalar>::into_value(*v) },
        (Shape::String, true) => quote! { ::recnet::Value::String(v.clone()) },
        (Shape::String, false) => quote! { ::recnet::Value::String(Some(v.clone())) },
        (Shape::Uuid, true) => quote! { ::recnet::Value::Uuid(*v) },
        (Shape::Uuid, false) => quote! { ::recnet::Value::Uuid(Some(*v)) },
        (Shape::Bytes, true) => quote! { ::recnet::Value::Bytes(v.clone()) },
        (Shape::Bytes, false) => quote! { ::recnet::Value::Bytes(Some(v.clone())) },
        (Shape::Array(t), true) => quote! {
            ::recnet::Value::Array(v.clone().map(<#t as ::recnet::message::Scalar>::wrap_array))
        },
        (Shape::Array(t), false) => quote! {
            ::recnet::Value::Array(Some(<#t as ::recnet::message::Scalar>::wrap_array(v.clone())))
        },
        (Shape::Enum(t), true) => quote! {
            ::recnet::Value::Enum(v.as_ref().map(<#t as ::recnet::MessageEnum>::ordinal))
        },
        (Shape::Enum(t), false) => quote! {
            ::recnet::Value::Enum(Some(<#t as ::recnet::MessageEnum>::ordinal(v)))
        },
        (Shape::Message { inner, .. }, true) => quote! {
            ::recnet::Value::Message(
                v.as_ref().map(|m| Box::new(<#inner as ::recnet::Message>::to_record(m)))
            )
        },
        (Shape::Message { inner, .. }, false) => quote! {
            ::recnet::Value::Message(Some(Box::new(<#inner as ::recnet::Message>::to_record(v))))
        },
        (Shape::Messages(t), true) => quote! {
            ::recnet::Value::Messages(v.as_ref().map(|items| {
                items
                    .iter()
                    .map(|m| Some(<#t as ::recnet::Message>::to_record(m)))
                    .collect()
            }))
        },
        (Shape::Messages(t), false) => quote! {
            ::recnet::Value::Messages(Some(
                v.iter()
                    .map(|m| Some(<#t as ::recnet::Message>::to_record(m)))
                    .collect()
            ))
        },
    };
    quote! {
        {
            let v = &self.#field_ident;
            #value
        }
    }
}

fn from_value(def: &FieldDef) -> TokenStream2 {
    let name = &def.name;
    let required = |value: TokenStream2| quote! { ::recnet::message::required(#value, #name)? };
    match (&def.shape, def.nullable) {
        (Shape::Scalar(t), _) => quote! { <#t as ::recnet::message::Scalar>::from_value(v)? },
        (Shape::String, true) => quote! { v.into_string()? },
        (Shape::String, false) => required(quote! { v.into_string()? }),
        (Shape::Uuid, true) => quote! { v.into_uuid()? },
        (Shape::Uuid, false) => required(quote! { v.into_uuid()? }),
        (Shape::Bytes, true) => quote! { v.into_bytes()? },
        (Shape::Bytes, false) => required(quote! { v.into_bytes()? }),
        (Shape::Array(t), true) => quote! {
            v.into_array()?
                .map(<#t as ::recnet::message::Scalar>::unwrap_array)
                .transpose()?
        },
        (Shape::Array(t), false) => {
            let array = required(quote! { v.into_array()? });
            quote! { <#t as ::recnet::message::Scalar>::unwrap_array(#array)? }
        }
        (Shape::Enum(t), true) => quote! {
            v.into_enum()?
                .map(::recnet::message::enum_from_ordinal::<#t>)
                .transpose()?
        },
        (Shape::Enum(t), false) => {
            let ordinal = required(quote! { v.into_enum()? });
            quote! { ::recnet::message::enum_from_ordinal::<#t>(#ordinal)? }
        }
        (Shape::Message { inner, boxed }, true) => {
            let convert = if *boxed {
                quote! { |r| <#inner as ::recnet::Message>::from_record(r).map(Box::new) }
            } else {
                quote! { <#inner as ::recnet::Message>::from_record }
            };
            quote! { v.into_message()?.map(#convert).transpose()? }
        }
        (Shape::Message { inner, boxed }, false) => {
            let record = required(quote! { v.into_message()? });
            let message = quote! { <#inner as ::recnet::Message>::from_record(#record)? };
            if *boxed {
                quote! { Box::new(#message) }
            } else {
                message
            }
        }
        (Shape::Messages(t), true) => quote! {
            v.into_messages()?
                .map(|items| ::recnet::message::records_into::<#t>(items, #name))
                .transpose()?
        },
        (Shape::Messages(t), false) => {
            let items = required(quote! { v.into_messages()? });
            quote! { ::recnet::message::records_into::<#t>(#items, #name)? }
        }
    }
}
