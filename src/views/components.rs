use maud::{html, Markup};

/// Inline error message under a form, or nothing.
pub fn form_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p.form-error role="alert" { (message) }
        }
    }
}

/// Round avatar: the photo when there is one, the first letter otherwise.
pub fn avatar(photo_url: Option<&str>, name: &str, email: &str) -> Markup {
    html! {
        @if let Some(url) = photo_url {
            img.avatar src=(url) alt=(name) width="64" height="64";
        } @else {
            span.avatar.avatar-initial { (initial(name, email)) }
        }
    }
}

pub fn initial(name: &str, email: &str) -> String {
    name.chars()
        .chain(email.chars())
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}
