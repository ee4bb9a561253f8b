//! Validation of submitted valuation forms.
//!
//! Form fields arrive as ordered `(name, value)` pairs. Validation either
//! produces a [`RawRequest`] or a user-facing message; nothing past this
//! point ever sees unparsed input.

use features::RawRequest;

/// Submitted form, in the order the browser sent it
pub type FormFields = Vec<(String, String)>;

/// Shown when a numeric field doesn't parse
pub const INVALID_NUMERIC_MESSAGE: &str = "Invalid numeric input. Please enter valid numbers.";

/// Numeric fields, in form order
pub const NUMERIC_FIELDS: [&str; 3] = ["year", "motor_volume", "running_km"];

/// Categorical fields, in form order
pub const CATEGORICAL_FIELDS: [&str; 6] = ["model", "motor_type", "wheel", "color", "type", "status"];

/// Why a form was turned away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Missing(&'static str),
    InvalidNumber(&'static str),
}

impl FormError {
    /// Message to show the user
    pub fn message(&self) -> String {
        match self {
            FormError::Missing(field) => format!("Missing required field: {}.", field),
            FormError::InvalidNumber(_) => INVALID_NUMERIC_MESSAGE.to_string(),
        }
    }
}

/// First value submitted for `name`
pub fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn required(fields: &[(String, String)], name: &'static str) -> Result<String, FormError> {
    field(fields, name)
        .map(str::to_string)
        .ok_or(FormError::Missing(name))
}

fn parse_float(fields: &[(String, String)], name: &'static str) -> Result<f64, FormError> {
    let value = required(fields, name)?
        .trim()
        .parse::<f64>()
        .map_err(|_| FormError::InvalidNumber(name))?;
    // "nan" and "inf" parse but can't be priced
    if !value.is_finite() {
        return Err(FormError::InvalidNumber(name));
    }
    Ok(value)
}

/// Validate a submitted form.
///
/// Numeric fields are checked first, then the categorical ones, which are
/// lower-cased.
pub fn parse_form(fields: &[(String, String)]) -> Result<RawRequest, FormError> {
    let year = required(fields, "year")?
        .trim()
        .parse::<i64>()
        .map_err(|_| FormError::InvalidNumber("year"))?;
    let motor_volume = parse_float(fields, "motor_volume")?;
    let running_km = parse_float(fields, "running_km")?;

    let categorical = |name: &'static str| required(fields, name).map(|v| v.to_lowercase());

    Ok(RawRequest {
        year,
        motor_volume,
        running_km,
        model: categorical("model")?,
        motor_type: categorical("motor_type")?,
        wheel: categorical("wheel")?,
        color: categorical("color")?,
        car_type: categorical("type")?,
        status: categorical("status")?,
    })
}

/// Normalized echo of a validated request, for re-filling the form
pub fn echo(raw: &RawRequest) -> FormFields {
    let mut fields = vec![
        ("year".to_string(), raw.year.to_string()),
        ("motor_volume".to_string(), format!("{:?}", raw.motor_volume)),
        ("running_km".to_string(), format!("{:?}", raw.running_km)),
    ];
    fields.extend(
        raw.categorical()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );
    fields
}
