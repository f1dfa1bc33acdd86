//! `%(key)s`-style substitution of sibling attribute values.
//!
//! Placeholder grammar: `%(key)[flags][width][.precision]conversion`.
//!
//! - flags: `-` left align, `0` zero pad, `+` always sign, ` ` space for
//!   positive numbers, `#` alternate form (`0x`/`0o` prefixes, kept decimal
//!   point, trailing zeros for `g`)
//! - conversions: `s` `r` (text), `d` `i` `u` (integer), `x` `X` `o`
//!   (hex/octal), `e` `E` `f` `F` `g` `G` (float), `c` (character)
//!
//! `%%` renders a literal percent sign.

use crate::core::{Attributes, FactoryError, Result, Value};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(
        r"%(?:(?P<escape>%)|\((?P<key>[^()]*)\)(?P<flags>[-0 +#]*)(?P<width>\d*)(?:\.(?P<precision>\d+))?(?P<conv>[a-zA-Z]?))"
    )
    .expect("placeholder pattern compiles");
}

/// Render every text entry of `attributes` in place, in insertion order.
///
/// This is a single pass: each template sees the mapping as it is at that
/// moment, and a substituted value is inserted verbatim even if it contains
/// placeholders of its own.
pub fn interpolate(attributes: &mut Attributes) -> Result<()> {
    let keys: Vec<String> = attributes.keys().map(String::from).collect();
    for key in keys {
        let rendered = match attributes.get(&key) {
            Some(Value::Text(template)) if template.contains('%') => {
                render(template, attributes)?
            }
            _ => continue,
        };
        attributes.insert(key, rendered);
    }
    Ok(())
}

/// Render one template against `values`.
pub fn render(template: &str, values: &Attributes) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let literal = &template[last..whole.start()];
        check_literal(literal)?;
        out.push_str(literal);
        out.push_str(&render_placeholder(&caps, values)?);
        last = whole.end();
    }

    let tail = &template[last..];
    check_literal(tail)?;
    out.push_str(tail);
    Ok(out)
}

fn check_literal(literal: &str) -> Result<()> {
    match literal.find('%') {
        None => Ok(()),
        Some(idx) => match literal[idx + 1..].chars().next() {
            None => Err(FactoryError::Format("incomplete format".into())),
            Some('(') => Err(FactoryError::Format("incomplete format key".into())),
            Some(_) => Err(FactoryError::Format(format!(
                "placeholder '{}' requires a mapping key",
                &literal[idx..]
            ))),
        },
    }
}

/// Parsed `[flags][width][.precision]` of one placeholder.
#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
}

impl Spec {
    fn parse(caps: &Captures<'_>) -> Result<Self> {
        let flags = caps.name("flags").map_or("", |m| m.as_str());
        let width = match caps.name("width").map(|m| m.as_str()) {
            Some(w) if !w.is_empty() => w
                .parse()
                .map_err(|_| FactoryError::Format(format!("bad width '{}'", w)))?,
            _ => 0,
        };
        let precision = caps
            .name("precision")
            .map(|m| {
                m.as_str()
                    .parse()
                    .map_err(|_| FactoryError::Format(format!("bad precision '{}'", m.as_str())))
            })
            .transpose()?;

        Ok(Self {
            left: flags.contains('-'),
            zero: flags.contains('0'),
            plus: flags.contains('+'),
            space: flags.contains(' '),
            alternate: flags.contains('#'),
            width,
            precision,
        })
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }
}

fn render_placeholder(caps: &Captures<'_>, values: &Attributes) -> Result<String> {
    if caps.name("escape").is_some() {
        return Ok("%".to_string());
    }

    let key = caps.name("key").map_or("", |m| m.as_str());
    let spec = Spec::parse(caps)?;
    let conv = caps.name("conv").map_or("", |m| m.as_str());

    let value = values
        .get(key)
        .ok_or_else(|| FactoryError::MissingKey(key.to_string()))?;

    match conv {
        "s" => Ok(pad_text(truncate(value.to_string(), spec.precision), &spec)),
        "r" => Ok(pad_text(truncate(value.repr(), spec.precision), &spec)),
        "c" => Ok(pad_text(character(value)?.to_string(), &spec)),
        "d" | "i" | "u" => {
            let n = value.as_i64().ok_or_else(|| not_a_number(conv, value))?;
            Ok(integer(n, 10, "", &spec))
        }
        "x" | "X" | "o" => {
            let n = strict_integer(conv, value)?;
            let (radix, prefix) = match conv {
                "x" => (16, "0x"),
                "X" => (16, "0X"),
                _ => (8, "0o"),
            };
            let rendered = integer(n, radix, prefix, &spec);
            Ok(if conv == "X" {
                rendered.to_uppercase()
            } else {
                rendered
            })
        }
        "e" | "E" | "f" | "F" | "g" | "G" => {
            let n = value.as_f64().ok_or_else(|| not_a_number(conv, value))?;
            let rendered = float(n, conv, &spec);
            Ok(if conv.chars().all(char::is_uppercase) {
                rendered.to_uppercase()
            } else {
                rendered
            })
        }
        "" => Err(FactoryError::Format("incomplete format".into())),
        other => Err(FactoryError::Format(format!(
            "unsupported format character '{}'",
            other
        ))),
    }
}

fn not_a_number(conv: &str, value: &Value) -> FactoryError {
    FactoryError::Format(format!(
        "%{} format: a number is required, not {}",
        conv,
        value.type_name()
    ))
}

fn strict_integer(conv: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Boolean(b) => Ok(*b as i64),
        _ => Err(FactoryError::Format(format!(
            "%{} format: an integer is required, not {}",
            conv,
            value.type_name()
        ))),
    }
}

fn character(value: &Value) -> Result<char> {
    match value {
        Value::Text(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(FactoryError::Format("%c requires a single character".into())),
            }
        }
        other => strict_integer("c", other).and_then(|n| {
            u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| FactoryError::Format(format!("%c arg not in range: {}", n)))
        }),
    }
}

fn integer(n: i64, radix: u32, prefix: &str, spec: &Spec) -> String {
    let magnitude = n.unsigned_abs();
    let mut digits = match radix {
        16 => format!("{:x}", magnitude),
        8 => format!("{:o}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(min) = spec.precision {
        if digits.len() < min {
            digits = format!("{}{}", "0".repeat(min - digits.len()), digits);
        }
    }
    let prefix = if spec.alternate { prefix } else { "" };
    pad_number(spec.sign(n < 0), prefix, &digits, spec, true)
}

fn float(n: f64, conv: &str, spec: &Spec) -> String {
    let sign = spec.sign(n.is_sign_negative() && !n.is_nan());
    if !n.is_finite() {
        let body = if n.is_nan() { "nan" } else { "inf" };
        return pad_number(sign, "", body, spec, false);
    }

    let magnitude = n.abs();
    let precision = spec.precision.unwrap_or(6);
    let body = match conv.to_ascii_lowercase().as_str() {
        "e" => {
            let body = exponent(magnitude, precision);
            if spec.alternate && precision == 0 {
                body.replacen('e', ".e", 1)
            } else {
                body
            }
        }
        "g" => general(magnitude, precision, spec.alternate),
        _ => {
            let body = format!("{:.*}", precision, magnitude);
            if spec.alternate && precision == 0 {
                body + "."
            } else {
                body
            }
        }
    };
    pad_number(sign, "", &body, spec, true)
}

/// Scientific notation with a signed, at least two digit exponent.
fn exponent(magnitude: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, magnitude);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            )
        }
        None => raw,
    }
}

fn general(magnitude: f64, precision: usize, alternate: bool) -> String {
    let significant = precision.max(1);
    let exp = if magnitude == 0.0 {
        0
    } else {
        format!("{:.*e}", significant - 1, magnitude)
            .split_once('e')
            .and_then(|(_, exp)| exp.parse::<i64>().ok())
            .unwrap_or(0)
    };

    let (mantissa, suffix) = if exp < -4 || exp >= significant as i64 {
        let body = exponent(magnitude, significant - 1);
        match body.split_once('e') {
            Some((mantissa, exp)) => (mantissa.to_string(), format!("e{}", exp)),
            None => (body, String::new()),
        }
    } else {
        let decimals = (significant as i64 - 1 - exp).max(0) as usize;
        (format!("{:.*}", decimals, magnitude), String::new())
    };

    if alternate {
        return mantissa + &suffix;
    }
    let trimmed = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa.as_str()
    };
    format!("{}{}", trimmed, suffix)
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(max) => text.chars().take(max).collect(),
        None => text,
    }
}

fn pad_text(body: String, spec: &Spec) -> String {
    let fill = spec.width.saturating_sub(body.chars().count());
    if fill == 0 {
        body
    } else if spec.left {
        format!("{}{}", body, " ".repeat(fill))
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}

/// Zero padding goes between the sign/prefix and the digits.
fn pad_number(sign: &str, prefix: &str, digits: &str, spec: &Spec, zero_ok: bool) -> String {
    let len = sign.len() + prefix.len() + digits.chars().count();
    let fill = spec.width.saturating_sub(len);
    if spec.left {
        format!("{}{}{}{}", sign, prefix, digits, " ".repeat(fill))
    } else if spec.zero && zero_ok {
        format!("{}{}{}{}", sign, prefix, "0".repeat(fill), digits)
    } else {
        format!("{}{}{}{}", " ".repeat(fill), sign, prefix, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Attributes {
        Attributes::new()
            .with("title", "Test Page")
            .with("count", 7)
            .with("ratio", 0.5)
            .with("enable_comments", false)
    }

    #[test]
    fn test_render_string_placeholder() {
        assert_eq!(render("<h1>%(title)s</h1>", &page()).unwrap(), "<h1>Test Page</h1>");
    }

    #[test]
    fn test_render_conversions() {
        let values = page();
        assert_eq!(render("%(count)d items", &values).unwrap(), "7 items");
        assert_eq!(render("%(count)03d", &values).unwrap(), "007");
        assert_eq!(render("[%(title)-12s]", &values).unwrap(), "[Test Page   ]");
        assert_eq!(render("%(ratio).2f", &values).unwrap(), "0.50");
        assert_eq!(render("%(title)r", &values).unwrap(), "'Test Page'");
        assert_eq!(render("%(title).4s", &values).unwrap(), "Test");
        assert_eq!(render("%(enable_comments)s", &values).unwrap(), "false");
        assert_eq!(render("100%%", &values).unwrap(), "100%");
    }

    #[test]
    fn test_render_sign_and_alternate_flags() {
        let values = page().with("negative", -42).with("big", 1234.5).with("letter", 65);
        assert_eq!(render("%(count)+d", &values).unwrap(), "+7");
        assert_eq!(render("%(count) d", &values).unwrap(), " 7");
        assert_eq!(render("%(negative)05d", &values).unwrap(), "-0042");
        assert_eq!(render("%(count)5.3d", &values).unwrap(), "  007");
        assert_eq!(render("%(negative)x", &values).unwrap(), "-2a");
        assert_eq!(render("%(letter)#06x", &values).unwrap(), "0x0041");
        assert_eq!(render("%(letter)#X", &values).unwrap(), "0X41");
        assert_eq!(render("%(count)#o", &values).unwrap(), "0o7");
        assert_eq!(render("%(letter)c", &values).unwrap(), "A");
        assert_eq!(render("%(ratio)+.1f", &values).unwrap(), "+0.5");
        assert_eq!(render("%(count)#.0f", &values).unwrap(), "7.");
    }

    #[test]
    fn test_render_exponent_and_general_floats() {
        let values = page().with("big", 1234.5).with("tiny", 0.00001234);
        assert_eq!(render("%(big)e", &values).unwrap(), "1.234500e+03");
        assert_eq!(render("%(tiny).2E", &values).unwrap(), "1.23E-05");
        assert_eq!(render("%(big)g", &values).unwrap(), "1234.5");
        assert_eq!(render("%(ratio)g", &values).unwrap(), "0.5");
        assert_eq!(render("%(tiny)g", &values).unwrap(), "1.234e-05");
        assert_eq!(render("%(big).2G", &values).unwrap(), "1.2E+03");
        assert_eq!(render("%(count)g", &values).unwrap(), "7");
    }

    #[test]
    fn test_hex_rejects_floats() {
        assert!(matches!(
            render("%(ratio)x", &page()),
            Err(FactoryError::Format(_))
        ));
    }

    #[test]
    fn test_missing_key() {
        match render("%(missing)s", &page()) {
            Err(FactoryError::MissingKey(key)) => assert_eq!(key, "missing"),
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_templates() {
        for template in ["100%", "%s", "%(title)", "%(title)q", "%(title", "%(title)c"] {
            assert!(
                matches!(render(template, &page()), Err(FactoryError::Format(_))),
                "template {:?} should fail",
                template
            );
        }
        assert!(matches!(
            render("%(title)d", &page()),
            Err(FactoryError::Format(_))
        ));
    }

    #[test]
    fn test_interpolate_is_single_pass() {
        let mut attributes = Attributes::new()
            .with("a", "%(b)s")
            .with("b", "%(c)s")
            .with("c", "end");
        interpolate(&mut attributes).unwrap();
        // `a` copied `b` before `b` was rendered.
        assert_eq!(attributes.get("a"), Some(&Value::from("%(c)s")));
        assert_eq!(attributes.get("b"), Some(&Value::from("end")));
    }

    #[test]
    fn test_interpolate_sees_earlier_rendered_entries() {
        let mut attributes = Attributes::new()
            .with("name", "x")
            .with("slug", "%(name)s-slug")
            .with("url", "/%(slug)s/");
        interpolate(&mut attributes).unwrap();
        assert_eq!(attributes.get("url"), Some(&Value::from("/x-slug/")));
    }

    #[test]
    fn test_interpolate_skips_non_text() {
        let mut attributes = page();
        let before = attributes.clone();
        interpolate(&mut attributes).unwrap();
        assert_eq!(attributes, before);
    }
}
