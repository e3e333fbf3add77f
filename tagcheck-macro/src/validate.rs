//! `#[derive(Validate)]`
//!
//! Reads `#[validate("...")]` and `#[validate(nested)]` on named fields,
//! checks the rule tags at compile time and emits the walker calls. Field
//! names follow `#[serde(rename)]` and `#[serde(rename_all)]`.

use crate::rename::RenameRule;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Token, Type, parse_macro_input,
};
use tagcheck_validation::{ParsedRuleSet, ParsedTag};

pub fn validate_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// One argument of `#[validate(...)]`
enum ValidateArg {
    Tag(LitStr),
    Nested,
}

impl Parse for ValidateArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(ValidateArg::Tag(input.parse()?));
        }

        let ident: Ident = input.parse()?;
        if ident == "nested" {
            Ok(ValidateArg::Nested)
        } else {
            Err(Error::new(
                ident.span(),
                format!(
                    "unknown validate option `{}`\n\n\
                     hint: use a rule tag like #[validate(\"required,email\")] or #[validate(nested)]",
                    ident
                ),
            ))
        }
    }
}

struct ValidatedField<'a> {
    member: &'a Ident,
    ty: &'a Type,
    ident: String,
    serialized: Option<String>,
    tag: Option<ParsedTag>,
    nested: bool,
}

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(named_fields_only(name)),
        },
        _ => return Err(named_fields_only(name)),
    };

    let rename_all = container_rename_all(&input.attrs)?;

    let mut validated = Vec::new();
    for field in fields {
        let Some(member) = &field.ident else {
            continue;
        };

        let (tag, nested) = validate_args(&field.attrs)?;
        if tag.is_none() && !nested {
            continue;
        }

        let ident = member.unraw().to_string();
        let serialized = match serde_rename(&field.attrs)? {
            Some(renamed) => Some(renamed),
            None => rename_all.map(|rule| rule.apply_to_field(&ident)),
        }
        .filter(|serialized| *serialized != ident);

        validated.push(ValidatedField {
            member,
            ty: &field.ty,
            ident,
            serialized,
            tag,
            nested,
        });
    }

    let walk = validated.iter().map(walk_field);
    let describe = validated.iter().map(describe_field);
    let type_name = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagcheck::Validate for #name #ty_generics #where_clause {
            const NAME: &'static str = #type_name;

            #[allow(unused_variables)]
            fn walk(&self, walker: &mut ::tagcheck::Walker<'_>) {
                #(#walk)*
            }

            #[allow(unused_variables)]
            fn describe(catalog: &mut ::tagcheck::RuleCatalog) {
                if !catalog.enter(::core::any::type_name::<Self>()) {
                    return;
                }
                #(#describe)*
            }
        }

        impl #impl_generics ::tagcheck::Nested for #name #ty_generics #where_clause {
            fn walk_nested(&self, walker: &mut ::tagcheck::Walker<'_>) {
                ::tagcheck::Validate::walk(self, walker)
            }

            fn describe_nested(catalog: &mut ::tagcheck::RuleCatalog) {
                <Self as ::tagcheck::Validate>::describe(catalog)
            }
        }

        impl #impl_generics ::tagcheck::AsFieldValue for #name #ty_generics #where_clause {
            fn as_field_value(&self) -> ::tagcheck::FieldValue<'_> {
                ::tagcheck::FieldValue::Struct
            }
        }
    })
}

fn named_fields_only(name: &Ident) -> Error {
    Error::new(
        name.span(),
        format!(
            "Validate can only be derived for structs with named fields\n\n\
             hint: `{}` needs fields like `email: String` to attach rules to",
            name
        ),
    )
}

/// Collect the rule tag and `nested` flag from a field's `#[validate]` attributes
fn validate_args(attrs: &[Attribute]) -> syn::Result<(Option<ParsedTag>, bool)> {
    let mut tag = None;
    let mut nested = false;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("validate")) {
        let args =
            attr.parse_args_with(Punctuated::<ValidateArg, Token![,]>::parse_terminated)?;

        for arg in args {
            match arg {
                ValidateArg::Tag(lit) => {
                    if tag.is_some() {
                        return Err(Error::new(
                            lit.span(),
                            "duplicate rule tag\n\n\
                             hint: combine the rules into one comma separated tag",
                        ));
                    }
                    let parsed = ParsedTag::parse(&lit.value()).map_err(|error| {
                        Error::new(
                            lit.span(),
                            format!(
                                "{}\n\n\
                                 hint: rule tags look like \"required,min=3,dive,email\"",
                                error
                            ),
                        )
                    })?;
                    tag = Some(parsed);
                }
                ValidateArg::Nested => nested = true,
            }
        }
    }

    Ok((tag, nested))
}

/// `#[serde(rename = "...")]` or `#[serde(rename(serialize = "..."))]` on a field
fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut renamed = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(lit) = serialize_name(&meta)? {
                    renamed = Some(lit.value());
                }
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }

    Ok(renamed)
}

/// `#[serde(rename_all = "...")]` on the container
fn container_rename_all(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    let mut rule = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if let Some(lit) = serialize_name(&meta)? {
                    rule = Some(RenameRule::parse(&lit.value(), lit.span())?);
                }
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }

    Ok(rule)
}

/// The serialize-side name of `key = "..."` or `key(serialize = "...", ...)`
fn serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(inner.value()?.parse()?);
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    Ok(name)
}

/// Consume a serde option this derive does not care about
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: TokenStream2 = content.parse()?;
    }
    Ok(())
}

fn rule_set_tokens(set: &ParsedRuleSet) -> TokenStream2 {
    let omitempty = set.omitempty;
    let rules = set.rules.iter().map(|rule| {
        let name = &rule.name;
        let param = match &rule.param {
            Some(param) => quote!(::core::option::Option::Some(#param)),
            None => quote!(::core::option::Option::None),
        };
        quote!(::tagcheck::RuleSpec::new(#name, #param))
    });

    quote! {
        ::tagcheck::RuleSet {
            omitempty: #omitempty,
            rules: &[#(#rules),*],
        }
    }
}

/// `FIELD` and `RULES` items shared by the walk and describe blocks
fn field_items(field: &ValidatedField) -> TokenStream2 {
    let ident = &field.ident;
    let serialized = match &field.serialized {
        Some(serialized) => quote!(::core::option::Option::Some(#serialized)),
        None => quote!(::core::option::Option::None),
    };

    let mut items = quote! {
        const FIELD: ::tagcheck::FieldName = ::tagcheck::FieldName::new(#ident, #serialized);
    };

    if let Some(tag) = &field.tag {
        let field_rules = rule_set_tokens(&tag.field);
        let element_rules = match &tag.elements {
            Some(set) => {
                let set = rule_set_tokens(set);
                quote!(::core::option::Option::Some(#set))
            }
            None => quote!(::core::option::Option::None),
        };

        items.extend(quote! {
            static RULES: ::tagcheck::FieldRules = ::tagcheck::FieldRules {
                field: #field_rules,
                elements: #element_rules,
            };
        });
    }

    items
}

fn walk_field(field: &ValidatedField) -> TokenStream2 {
    let items = field_items(field);
    let member = field.member;
    let mut calls = TokenStream2::new();

    if let Some(tag) = &field.tag {
        if tag.elements.is_some() {
            calls.extend(quote!(walker.field_with_elements(FIELD, &self.#member, &RULES);));
        } else {
            calls.extend(quote!(walker.field(FIELD, &self.#member, &RULES);));
        }
    }
    if field.nested {
        calls.extend(quote!(walker.nested(FIELD, &self.#member);));
    }

    quote!({ #items #calls })
}

fn describe_field(field: &ValidatedField) -> TokenStream2 {
    let items = field_items(field);
    let ty = field.ty;
    let mut calls = TokenStream2::new();

    if field.tag.is_some() {
        calls.extend(quote!(catalog.field(FIELD, &RULES);));
    }
    if field.nested {
        calls.extend(quote!(catalog.nested::<#ty>(FIELD);));
    }

    quote!({ #items #calls })
}
