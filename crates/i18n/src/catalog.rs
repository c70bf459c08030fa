//! Static message catalogs.
//!
//! Missing keys fall back to English and then to the key itself.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::locale::Locale;
use crate::scope::current;

const CATALOG_EN: &[(&str, &str)] = &[
    ("app.name", "Storefront"),
    ("products.index.title", "Products"),
    ("products.show.title", "Product"),
    ("products.new.title", "New product"),
    ("products.edit.title", "Editing product"),
    ("products.create.notice", "Product was successfully created."),
    ("products.update.notice", "Product was successfully updated."),
    ("products.destroy.notice", "Product was successfully destroyed."),
    ("errors.messages.blank", "can't be blank"),
    ("errors.messages.too_long", "is too long (maximum is {count} characters)"),
    ("errors.not_found", "Product not found"),
    ("errors.unauthorized", "You need to sign in before continuing."),
    ("errors.parameter_missing", "param is missing or the value is empty: {param}"),
    ("errors.unsupported_locale", "unsupported locale: {locale}"),
    ("errors.internal", "Something went wrong. Please try again later."),
];

const CATALOG_ES: &[(&str, &str)] = &[
    ("products.index.title", "Productos"),
    ("products.show.title", "Producto"),
    ("products.new.title", "Nuevo producto"),
    ("products.edit.title", "Editando producto"),
    ("products.create.notice", "El producto se creó correctamente."),
    ("products.update.notice", "El producto se actualizó correctamente."),
    ("products.destroy.notice", "El producto se eliminó correctamente."),
    ("errors.messages.blank", "no puede estar en blanco"),
    ("errors.messages.too_long", "es demasiado largo ({count} caracteres máximo)"),
    ("errors.not_found", "Producto no encontrado"),
    ("errors.unauthorized", "Tienes que iniciar sesión para continuar."),
    ("errors.parameter_missing", "falta el parámetro o el valor está vacío: {param}"),
    ("errors.unsupported_locale", "idioma no soportado: {locale}"),
    ("errors.internal", "Algo salió mal. Inténtalo de nuevo más tarde."),
];

type Bundle = HashMap<&'static str, &'static str>;

fn bundles() -> &'static HashMap<Locale, Bundle> {
    static BUNDLES: OnceLock<HashMap<Locale, Bundle>> = OnceLock::new();
    BUNDLES.get_or_init(|| {
        HashMap::from([
            (Locale::En, CATALOG_EN.iter().copied().collect()),
            (Locale::Es, CATALOG_ES.iter().copied().collect()),
        ])
    })
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    bundles().get(&locale).and_then(|b| b.get(key)).copied()
}

/// Translate `key` for an explicit locale, substituting `{name}` placeholders.
pub fn translate(locale: Locale, key: &str, args: &[(&str, String)]) -> String {
    let template = match lookup(locale, key).or_else(|| lookup(Locale::En, key)) {
        Some(t) => t,
        None => {
            tracing::debug!(locale = %locale, key, "missing translation");
            return key.to_string();
        }
    };

    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Translate `key` in the active locale.
pub fn t(key: &str) -> String {
    translate(current(), key, &[])
}

/// Translate `key` in the active locale with placeholder arguments.
pub fn t_with(key: &str, args: &[(&str, String)]) -> String {
    translate(current(), key, args)
}
