use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Visibility, parse_macro_input, parse_quote};

/// Derive macro making a struct a transferable record.
///
/// Generates `Transferable`, `RecordView` and `RecordSlot` for the struct.
/// Every field type must itself be `Transferable`; `pub` fields are
/// exported, private fields are never read or written by name.
///
/// Field tags are given per namespace:
///
/// ```ignore
/// #[derive(Default, Transfer)]
/// pub struct User {
///     #[transfer(t2t = "user_id", json = "id,omitempty")]
///     pub id: i64,
///
///     #[transfer(t2t = ",inline")]
///     pub profile: Profile,
///
///     #[transfer(t2t = "-")]
///     pub cache: String,
/// }
/// ```
///
/// Hooks are wired with container flags; the struct must implement the
/// matching trait:
///
/// | flag             | trait             |
/// |------------------|-------------------|
/// | `marshal`        | `Marshaler`       |
/// | `unmarshal`      | `Unmarshaler`     |
/// | `json_marshal`   | `JsonMarshaler`   |
/// | `json_unmarshal` | `JsonUnmarshaler` |
/// | `text_key`       | `TextMarshaler`   |
#[proc_macro_derive(Transfer, attributes(transfer))]
pub fn derive_transfer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct Hooks {
    marshal: bool,
    unmarshal: bool,
    json_marshal: bool,
    json_unmarshal: bool,
    text_key: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Transfer only supports structs with named fields",
                ));
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Transfer only supports structs")),
    };

    let hooks = parse_hooks(input)?;

    let mut infos = Vec::new();
    let mut idents = Vec::new();
    let mut indexes = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.unraw().to_string();
        let exported = matches!(field.vis, Visibility::Public(_));

        let mut namespaces = Vec::new();
        let mut tags = Vec::new();
        for attr in &field.attrs {
            if !attr.path().is_ident("transfer") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let namespace = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("expected `<namespace> = \"tag\"`"))?
                    .unraw()
                    .to_string();
                let tag: LitStr = meta.value()?.parse()?;
                namespaces.push(namespace);
                tags.push(tag.value());
                Ok(())
            })?;
        }

        infos.push(quote! {
            ::t2t::FieldInfo {
                name: #field_name_str,
                tags: &[#((#namespaces, #tags)),*],
                exported: #exported,
            }
        });
        idents.push(field_name);
        indexes.push(index);
    }

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        where_clause.predicates.push(parse_quote!(Self: 'static));
        if !input.generics.params.is_empty() {
            for field in &fields {
                let ty = &field.ty;
                where_clause.predicates.push(parse_quote!(#ty: ::t2t::Transferable));
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let hook_methods = hook_methods(&hooks);

    Ok(quote! {
        impl #impl_generics ::t2t::Transferable for #name #ty_generics #where_clause {
            fn view(&self) -> ::t2t::View<'_> {
                ::t2t::View::Record(self)
            }

            fn slot(&mut self) -> ::t2t::Slot<'_> {
                ::t2t::Slot::Record(self)
            }

            fn is_zero(&self) -> bool {
                true #(&& ::t2t::Transferable::is_zero(&self.#idents))*
            }

            #hook_methods
        }

        impl #impl_generics ::t2t::RecordView for #name #ty_generics #where_clause {
            fn record_id(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<Self>()
            }

            fn fields(&self) -> &'static [::t2t::FieldInfo] {
                const FIELDS: &[::t2t::FieldInfo] = &[#(#infos),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::std::option::Option<&dyn ::t2t::Transferable> {
                match index {
                    #(#indexes => ::std::option::Option::Some(&self.#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::t2t::RecordSlot for #name #ty_generics #where_clause {
            fn field_mut(&mut self, index: usize) -> ::std::option::Option<&mut dyn ::t2t::Transferable> {
                match index {
                    #(#indexes => ::std::option::Option::Some(&mut self.#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

/// Parse container flags from `#[transfer(...)]` on the struct itself.
fn parse_hooks(input: &DeriveInput) -> Result<Hooks, syn::Error> {
    let mut hooks = Hooks::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("transfer") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let flag = if meta.path.is_ident("marshal") {
                &mut hooks.marshal
            } else if meta.path.is_ident("unmarshal") {
                &mut hooks.unmarshal
            } else if meta.path.is_ident("json_marshal") {
                &mut hooks.json_marshal
            } else if meta.path.is_ident("json_unmarshal") {
                &mut hooks.json_unmarshal
            } else if meta.path.is_ident("text_key") {
                &mut hooks.text_key
            } else {
                return Err(meta.error(
                    "unknown flag (expected marshal, unmarshal, json_marshal, json_unmarshal or text_key)",
                ));
            };
            *flag = true;
            Ok(())
        })?;
    }
    Ok(hooks)
}

fn hook_methods(hooks: &Hooks) -> TokenStream2 {
    let mut methods = TokenStream2::new();
    if hooks.marshal {
        methods.extend(quote! {
            fn as_marshaler(&self) -> ::std::option::Option<&dyn ::t2t::Marshaler> {
                ::std::option::Option::Some(self)
            }
        });
    }
    if hooks.unmarshal {
        methods.extend(quote! {
            fn as_unmarshaler(&mut self) -> ::std::option::Option<&mut dyn ::t2t::Unmarshaler> {
                ::std::option::Option::Some(self)
            }
        });
    }
    if hooks.json_marshal {
        methods.extend(quote! {
            fn as_json_marshaler(&self) -> ::std::option::Option<&dyn ::t2t::JsonMarshaler> {
                ::std::option::Option::Some(self)
            }
        });
    }
    if hooks.json_unmarshal {
        methods.extend(quote! {
            fn as_json_unmarshaler(&mut self) -> ::std::option::Option<&mut dyn ::t2t::JsonUnmarshaler> {
                ::std::option::Option::Some(self)
            }
        });
    }
    if hooks.text_key {
        methods.extend(quote! {
            fn as_text_marshaler(&self) -> ::std::option::Option<&dyn ::t2t::TextMarshaler> {
                ::std::option::Option::Some(self)
            }
        });
    }
    methods
}
