//! `#[module]` implementation.
//!
//! Every `pub fn name(&self, ctx: &Context<'_>, a: A, b: B) -> Result<T>` of
//! the annotated impl block becomes one operation:
//!
//! - canonical name built from each argument's `FromValue::CANONICAL`,
//!   e.g. `name(address,tier)`, hashed into its signature
//! - declaration line `fn name(a: A, b: B) -> T` (no arrow when `T` is `()`)
//!
//! All operations form a single capability.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{
    FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemImpl, LitInt, Pat, Path,
    PathArguments, ReturnType, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[module]` macro.
pub(crate) struct ModuleArgs {
    capability: Option<LitInt>,
    krate: Option<Path>,
}

impl Parse for ModuleArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut capability = None;
        let mut krate = None;

        while !input.is_empty() {
            let key = if input.peek(Token![crate]) {
                input.parse::<Token![crate]>()?;
                "crate".to_owned()
            } else {
                let ident: Ident = input.parse()?;
                ident.to_string()
            };
            input.parse::<Token![=]>()?;

            match key.as_str() {
                "capability" => capability = Some(input.parse()?),
                "crate" => krate = Some(input.parse()?),
                other => {
                    return Err(syn::Error::new(
                        input.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ModuleArgs { capability, krate })
    }
}

/// One exposed operation.
struct Operation<'a> {
    method: &'a Ident,
    declaration: String,
    arg_types: Vec<&'a Type>,
}

fn compact(tokens: impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn spaced(tokens: impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .replace(" < ", "<")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
        .replace(" :: ", "::")
}

/// `T` from `Result<T>` / `Result<T, E>`.
fn result_payload(output: &ReturnType) -> Option<&Type> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = &**ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn operation(method: &ImplItemFn) -> syn::Result<Operation<'_>> {
    let sig = &method.sig;
    let mut inputs = sig.inputs.iter();

    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "module operations must take `&self` first",
            ));
        }
    }
    if !matches!(inputs.next(), Some(FnArg::Typed(_))) {
        return Err(syn::Error::new_spanned(
            sig,
            "module operations must take `ctx: &Context<'_>` after `&self`",
        ));
    }

    let mut arg_types = Vec::new();
    let mut params = Vec::new();
    for arg in inputs {
        let FnArg::Typed(pat_type) = arg else {
            return Err(syn::Error::new_spanned(arg, "unexpected receiver"));
        };
        let name = match &*pat_type.pat {
            Pat::Ident(ident) => ident.ident.to_string(),
            other => compact(other),
        };
        params.push(format!("{}: {}", name, spaced(&pat_type.ty)));
        arg_types.push(&*pat_type.ty);
    }

    let Some(payload) = result_payload(&sig.output) else {
        return Err(syn::Error::new_spanned(
            &sig.output,
            "module operations must return `Result<T>`",
        ));
    };

    let mut declaration = format!("fn {}({})", sig.ident, params.join(", "));
    if !is_unit(payload) {
        declaration.push_str(" -> ");
        declaration.push_str(&spaced(payload));
    }

    Ok(Operation {
        method: &sig.ident,
        declaration,
        arg_types,
    })
}

/// Implementation of the `#[module]` macro.
pub fn module_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ModuleArgs);
    let input = parse_macro_input!(item as ItemImpl);

    match expand(&args, &input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &ModuleArgs, input: &ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[module] goes on an inherent impl block",
        ));
    }

    let krate = args
        .krate
        .as_ref()
        .map(|path| quote! { #path })
        .unwrap_or_else(|| quote! { ::extendable });

    let operations = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) if matches!(method.vis, Visibility::Public(_)) => Some(method),
            _ => None,
        })
        .map(operation)
        .collect::<syn::Result<Vec<_>>>()?;

    if operations.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "#[module] needs at least one `pub fn` operation",
        ));
    }

    let canonical = |op: &Operation<'_>| {
        let name = op.method.to_string();
        let types = &op.arg_types;
        quote! {
            #krate::canonical_name(#name, &[#(<#types as #krate::FromValue>::CANONICAL),*])
        }
    };

    let functions = operations.iter().map(|op| {
        let name = canonical(op);
        let declaration = &op.declaration;
        quote! { #krate::FunctionDecl::new(&#name, #declaration) }
    });

    let capability = match &args.capability {
        Some(id) => quote! {
            #krate::CapabilityDecl::with_id(
                #krate::CapabilityId::from(#id as u32),
                [#(#functions),*],
            )
        },
        None => quote! {
            #krate::CapabilityDecl::from_functions([#(#functions),*])
        },
    };

    let routes = operations.iter().map(|op| {
        let name = canonical(op);
        let method = op.method;
        let names: Vec<_> = (0..op.arg_types.len())
            .map(|i| format_ident!("__arg{}", i))
            .collect();
        let decode = names.iter().zip(&op.arg_types).enumerate().map(|(i, (name, ty))| {
            quote! { let #name: #ty = call.arg(#i)?; }
        });
        quote! {
            if call.signature == #krate::Signature::of(&#name) {
                #(#decode)*
                let output = Self::#method(self, ctx, #(#names),*)?;
                return ::core::result::Result::Ok(#krate::IntoValue::into_value(output));
            }
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics #krate::Module for #self_ty #where_clause {
            fn interface(&self) -> #krate::Interface {
                #krate::Interface::single(#capability)
            }

            fn invoke(
                &self,
                ctx: &#krate::Context<'_>,
                call: &#krate::Call,
            ) -> #krate::Result<#krate::Value> {
                #(#routes)*
                ::core::result::Result::Err(#krate::ExtendableError::NotImplemented(call.signature))
            }
        }
    })
}
