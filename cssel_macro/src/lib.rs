#![allow(clippy::needless_return)]

use proc_macro_error::abort_call_site;

use proc_macro2::{Ident, TokenTree};
use proc_macro_error::{abort, proc_macro_error};
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Implements `crate::parser::ast::Spanned` for a struct carrying
/// `start: usize` and `end: usize` fields.
#[proc_macro_error]
#[proc_macro_derive(Spanned)]
pub fn derive_spanned(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        abort!(name, "`Spanned` can only be derived for structs");
    };
    let Fields::Named(fields) = &data.fields else {
        abort!(name, "`Spanned` requires named `start` and `end` fields");
    };
    for required in ["start", "end"] {
        let found = fields
            .named
            .iter()
            .any(|field| field.ident.as_ref().is_some_and(|id| *id == required));
        if !found {
            abort!(name, "`Spanned` requires a `{}: usize` field", required);
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    return quote!(
        impl #impl_generics crate::parser::ast::Spanned for #name #ty_generics #where_clause {
            fn start(&self) -> usize {
                self.start
            }
            fn end(&self) -> usize {
                self.end
            }
            fn set_start(&mut self, start: usize) {
                self.start = start;
            }
            fn set_end(&mut self, end: usize) {
                self.end = end;
            }
        }
    )
    .into();
}

/// `pseudo_class` -> `PseudoClass`
fn to_variant(id: &Ident) -> Ident {
    let pascal: String = id
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&pascal, id.span())
}

/// `assert_parse_node!("text", kind, kind, ..)` expands to a call of the
/// test-local `assert_node` helper with the expected `NodeKind`s of the
/// single parsed selector.
#[proc_macro_error]
#[proc_macro]
pub fn assert_parse_node(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let tokens = proc_macro2::TokenStream::from(input);

    let mut i = tokens.into_iter();

    let tt = i
        .next()
        .unwrap_or_else(|| abort_call_site!("must pass selector text and node kinds"));

    let TokenTree::Literal(text) = tt else {
        abort!(tt, "first value must be string literal");
    };

    let mut kinds = Vec::new();
    while let Some(tt) = i.next() {
        let TokenTree::Punct(_comma) = tt else {
            abort!(tt, "expected comma");
        };
        let Some(tt) = i.next() else {
            // trailing comma
            break;
        };
        let TokenTree::Ident(kind) = tt else {
            abort!(tt, "expected node kind ident");
        };
        kinds.push(to_variant(&kind));
    }

    return quote!(assert_node(#text, &[#(NodeKind::#kinds),*])).into();
}

/// `assert_parse_error!("text", invalid_namespace)` expands to a call of the
/// test-local `assert_error` helper, checking that the first diagnostic of
/// the parsed text is a `SelectorDiagnostic::InvalidNamespace`.
#[proc_macro_error]
#[proc_macro]
pub fn assert_parse_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let tokens = proc_macro2::TokenStream::from(input);

    let mut i = tokens.into_iter();

    let tt = i
        .next()
        .unwrap_or_else(|| abort_call_site!("must pass text and diagnostic ident"));

    let TokenTree::Literal(text) = tt else {
        abort!(tt, "first value must be string literal");
    };

    let tt = i
        .next()
        .unwrap_or_else(|| abort_call_site!("must pass text and ident seperated by comma"));
    let TokenTree::Punct(_comma) = tt else {
        abort!(tt, "expected comma");
    };

    let tt = i
        .next()
        .unwrap_or_else(|| abort_call_site!("expected 2nd argument for diagnostic ident"));
    let TokenTree::Ident(error_ident) = tt else {
        abort!(tt, "expected diagnostic ident");
    };
    if let Some(tt) = i.next() {
        if !matches!(&tt, TokenTree::Punct(p) if p.as_char() == ',') || i.next().is_some() {
            abort!(tt, "unexpected tokens after diagnostic ident");
        }
    }

    let variant = to_variant(&error_ident);
    return quote!(assert_error(
        #text,
        |diagnostic: &SelectorDiagnostic| matches!(diagnostic, SelectorDiagnostic::#variant { .. }),
        stringify!(#variant)
    ))
    .into();
}
