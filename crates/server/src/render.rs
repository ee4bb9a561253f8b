//! HTML rendering for the landing and valuation pages.

use std::fmt::Write;

use crate::form::{self, FormFields, CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use crate::service::Valuation;

/// Shown when scoring fails; the cause stays in the logs
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Unable to estimate a price right now. Please try again later.";

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.6rem}input{width:100%;padding:.3rem}\
.error{color:#b00020}.estimate{font-size:1.4rem;font-weight:bold}\
.photos img{width:100%;margin-top:1rem;border-radius:4px}";

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn landing_page() -> String {
    layout(
        "Car Price Estimator",
        "<h1>Car Price Estimator</h1>\n\
         <p>Estimate the market price of a used car from a few details.</p>\n\
         <p><a href=\"/valuation\">Get a valuation</a></p>\n",
    )
}

fn label_for(field: &str) -> &'static str {
    match field {
        "year" => "Year",
        "motor_volume" => "Engine volume (L)",
        "running_km" => "Mileage (km)",
        "model" => "Make",
        "motor_type" => "Fuel type",
        "wheel" => "Steering wheel",
        "color" => "Color",
        "type" => "Body type",
        "status" => "Condition",
        _ => "",
    }
}

fn render_form(out: &mut String, echoed: Option<&FormFields>) {
    out.push_str("<form method=\"post\" action=\"/valuation\">\n");
    for name in NUMERIC_FIELDS.iter().chain(CATEGORICAL_FIELDS.iter()) {
        let value = echoed
            .and_then(|fields| form::field(fields, name))
            .unwrap_or("");
        let _ = writeln!(
            out,
            "<label for=\"{name}\">{label}</label>\
             <input id=\"{name}\" name=\"{name}\" value=\"{value}\" required>",
            name = name,
            label = label_for(name),
            value = escape_html(value),
        );
    }
    out.push_str("<p><button type=\"submit\">Estimate price</button></p>\n</form>\n");
}

/// The valuation page, optionally showing the outcome of a submission
pub fn valuation_page(valuation: Option<&Valuation>) -> String {
    let mut body = String::from("<h1>Car Valuation</h1>\n");

    match valuation {
        Some(Valuation::Rejected { message, .. }) => {
            let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(message));
        }
        Some(Valuation::Estimated {
            estimate_text,
            image_urls,
            ..
        }) => {
            let _ = writeln!(body, "<p class=\"estimate\">{}</p>", escape_html(estimate_text));
            if !image_urls.is_empty() {
                body.push_str("<div class=\"photos\">\n");
                for url in image_urls {
                    let _ = writeln!(body, "<img src=\"{}\" alt=\"Car photo\">", escape_html(url));
                }
                body.push_str("</div>\n");
            }
        }
        None => {}
    }

    render_form(&mut body, valuation.map(Valuation::echoed_input));
    layout("Car Valuation", &body)
}

/// Valuation page with a generic failure message and the user's input
pub fn internal_error_page(echoed: &FormFields) -> String {
    let mut body = String::from("<h1>Car Valuation</h1>\n");
    let _ = writeln!(body, "<p class=\"error\">{}</p>", INTERNAL_ERROR_MESSAGE);
    render_form(&mut body, Some(echoed));
    layout("Car Valuation", &body)
}
