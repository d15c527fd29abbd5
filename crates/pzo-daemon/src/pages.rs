//! Server-rendered pages: the navigation shell and the order form.
//!
//! Plain strings; every piece of user-supplied text goes through
//! [`escape_html`].

use pzo_form::{catalog, Field, FormView, Outcome};

/// Form field name for a topping checkbox.
pub fn topping_input_name(id: &str) -> String {
    format!("topping_{id}")
}

pub fn render_landing() -> String {
    layout(
        "Home",
        "<h2>Welcome to Bloom Pizza!</h2>\n<p><a href=\"/order\">Order a pizza</a></p>",
    )
}

pub fn render_order(view: &FormView) -> String {
    let mut body = String::new();
    body.push_str("<h2>Order Your Pizza</h2>\n");

    match &view.outcome {
        Outcome::Success(m) => {
            body.push_str(&format!("<div class=\"success\">{}</div>\n", escape_html(m)))
        }
        Outcome::Failure(m) => {
            body.push_str(&format!("<div class=\"failure\">{}</div>\n", escape_html(m)))
        }
        Outcome::None => {}
    }

    body.push_str("<form method=\"post\" action=\"/order\">\n");

    // fullName
    body.push_str(&format!(
        "<div class=\"input-group\"><label for=\"fullName\">Full Name</label>\
         <input id=\"fullName\" name=\"fullName\" type=\"text\" placeholder=\"Type full name\" value=\"{}\">{}</div>\n",
        escape_html(&view.values.full_name),
        error_line(view, Field::FullName)
    ));

    // size
    let mut options = String::from("<option value=\"\">----Choose Size----</option>");
    for (code, label) in catalog::SIZE_OPTIONS {
        let selected = if view.values.size == code { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{code}\"{selected}>{}</option>",
            capitalize(label)
        ));
    }
    body.push_str(&format!(
        "<div class=\"input-group\"><label for=\"size\">Size</label>\
         <select id=\"size\" name=\"size\">{options}</select>{}</div>\n",
        error_line(view, Field::Size)
    ));

    // toppings
    body.push_str("<div class=\"input-group\">");
    for t in catalog::TOPPINGS.iter() {
        let checked = if view.values.has_topping(t.id) {
            " checked"
        } else {
            ""
        };
        body.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"{}\"{checked}> {}</label><br>",
            topping_input_name(t.id),
            t.label
        ));
    }
    body.push_str("</div>\n");

    let disabled = if view.can_submit { "" } else { " disabled" };
    body.push_str("<button type=\"submit\" name=\"action\" value=\"check\">Check</button>\n");
    body.push_str(&format!(
        "<button type=\"submit\" name=\"action\" value=\"submit\"{disabled}>Place order</button>\n"
    ));
    body.push_str("</form>");

    layout("Order", &body)
}

fn error_line(view: &FormView, field: Field) -> String {
    let msg = view.errors.get(field);
    if msg.is_empty() {
        String::new()
    } else {
        format!("<div class=\"error\">{}</div>", escape_html(msg))
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} | Bloom Pizza</title></head>\n\
         <body>\n<nav><a href=\"/\">Home</a> <a href=\"/order\">Order</a></nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n"
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
