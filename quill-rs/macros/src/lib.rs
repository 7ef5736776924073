//! Derive macros for quill-rs. `#[derive(Command)]` and `#[derive(Query)]` implement `Message` plus
//! `Command`/`Query`, so you don't write the impls by hand.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Command)]
//! #[command(output = Uuid)]
//! pub struct CreateBlogPost { /* ... */ }
//!
//! #[derive(Serialize, Deserialize, Command)]
//! #[command(handler = crate::users::handlers::EmailVerificationHandler)]
//! pub struct VerifyUserEmail { pub token: String }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, Path, Type};

#[derive(Default)]
struct MessageArgs {
    handler: Option<Path>,
    output: Option<Type>,
}

fn parse_args(attrs: &[Attribute], attr_name: &str) -> syn::Result<MessageArgs> {
    let mut args = MessageArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident(attr_name)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("handler") {
                args.handler = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("output") {
                args.output = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `handler = Path` or `output = Type`"))
            }
        })?;
    }
    Ok(args)
}

fn message_impl(input: &DeriveInput, args: &MessageArgs) -> TokenStream2 {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let declared = args.handler.as_ref().map(|handler| {
        quote! {
            fn declared_handler() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::std::any::type_name::<#handler>())
            }
        }
    });
    quote! {
        impl #impl_generics ::quill_rs::Message for #name #ty_generics #where_clause {
            #declared
        }
    }
}

/// Implements `Message` and `Command`. Optional `#[command(output = Type, handler = Path)]`;
/// `output` defaults to `()`, `handler` overrides the naming convention.
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let args = match parse_args(&input.attrs, "command") {
        Ok(args) => args,
        Err(e) => return e.into_compile_error().into(),
    };
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let output = args
        .output
        .as_ref()
        .map(|ty| quote!(#ty))
        .unwrap_or_else(|| quote!(()));
    let message = message_impl(&input, &args);
    let expanded = quote! {
        #message
        impl #impl_generics ::quill_rs::Command for #name #ty_generics #where_clause {
            type Output = #output;
        }
    };
    TokenStream::from(expanded)
}

/// Implements `Message` and `Query`. Requires `#[query(output = Type)]`; `handler = Path` is optional.
#[proc_macro_derive(Query, attributes(query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let args = match parse_args(&input.attrs, "query") {
        Ok(args) => args,
        Err(e) => return e.into_compile_error().into(),
    };
    let Some(output) = args.output.as_ref() else {
        return syn::Error::new_spanned(&input.ident, "queries must declare #[query(output = Type)]")
            .into_compile_error()
            .into();
    };
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let message = message_impl(&input, &args);
    let expanded = quote! {
        #message
        impl #impl_generics ::quill_rs::Query for #name #ty_generics #where_clause {
            type Output = #output;
        }
    };
    TokenStream::from(expanded)
}
