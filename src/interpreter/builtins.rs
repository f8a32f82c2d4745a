use std::io::Write;

use crate::interpreter::value::{
    core::Value,
    function::{NativeFunction, NativeResult},
};

/// The registration surface for built-in callables.
///
/// A registry maps names to natively implemented functions with a fixed
/// arity. The interpreter installs the entries into its global
/// environment at construction and otherwise has no knowledge of what the
/// functions do — tests register capturing handlers through the same
/// surface.
#[derive(Debug, Default)]
pub struct Registry {
    natives: Vec<NativeFunction>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built-in under `name` with a fixed `arity`.
    ///
    /// The handler receives exactly `arity` evaluated argument values. It
    /// may produce a value, produce nothing, or fail with a description
    /// that becomes a runtime error at the call site.
    pub fn define(&mut self,
                  name: &str,
                  arity: usize,
                  handler: impl Fn(&[Value]) -> NativeResult + 'static) {
        self.natives.push(NativeFunction { name: name.to_string(),
                                           arity,
                                           handler: Box::new(handler) });
    }

    pub(crate) fn into_natives(self) -> Vec<NativeFunction> {
        self.natives
    }

    /// The standard library: console I/O, casts, and a few numeric and
    /// string helpers.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.define("schreibe", 1, |args| {
                    print!("{}", args[0]);
                    let _ = std::io::stdout().flush();
                    Ok(None)
                });

        registry.define("schreibeZeile", 1, |args| {
                    println!("{}", args[0]);
                    Ok(None)
                });

        registry.define("leseZeile", 0, |_args| {
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)
                                    .map_err(|error| {
                                        format!("Lesen von der Eingabe fehlgeschlagen: {error}")
                                    })?;
                    while line.ends_with('\n') || line.ends_with('\r') {
                        line.pop();
                    }
                    Ok(Some(Value::Text(line)))
                });

        registry.define("zeit", 0, |_args| {
                    let elapsed = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map_err(|_| "Die Systemzeit liegt vor 1970!".to_string())?;
                    Ok(Some(Value::Float(elapsed.as_secs_f64())))
                });

        registry.define("zuZahl", 1, |args| match &args[0] {
                    Value::Int(n) => Ok(Some(Value::Int(*n))),
                    Value::Float(f) => Ok(Some(Value::Int(*f as i64))),
                    Value::Bool(b) => Ok(Some(Value::Int(i64::from(*b)))),
                    Value::Char(c) => c.to_digit(10)
                                       .map(|digit| Some(Value::Int(i64::from(digit))))
                                       .ok_or_else(|| cast_failure(&args[0], "eine Zahl")),
                    Value::Text(s) => s.trim()
                                       .parse::<i64>()
                                       .map(|n| Some(Value::Int(n)))
                                       .map_err(|_| cast_failure(&args[0], "eine Zahl")),
                    _ => Err(cast_failure(&args[0], "eine Zahl")),
                });

        registry.define("zuKommazahl", 1, |args| match &args[0] {
                    Value::Int(n) => Ok(Some(Value::Float(*n as f64))),
                    Value::Float(f) => Ok(Some(Value::Float(*f))),
                    Value::Bool(b) => Ok(Some(Value::Float(if *b { 1.0 } else { 0.0 }))),
                    Value::Text(s) => s.trim()
                                       .replace(',', ".")
                                       .parse::<f64>()
                                       .map(|f| Some(Value::Float(f)))
                                       .map_err(|_| cast_failure(&args[0], "eine Kommazahl")),
                    _ => Err(cast_failure(&args[0], "eine Kommazahl")),
                });

        registry.define("zuZeichenkette", 1, |args| {
                    Ok(Some(Value::Text(args[0].to_string())))
                });

        registry.define("zuBoolean", 1, |args| match &args[0] {
                    Value::Bool(b) => Ok(Some(Value::Bool(*b))),
                    Value::Int(n) => Ok(Some(Value::Bool(*n != 0))),
                    Value::Text(s) => match s.as_str() {
                        "wahr" => Ok(Some(Value::Bool(true))),
                        "falsch" => Ok(Some(Value::Bool(false))),
                        _ => Err(cast_failure(&args[0], "einen Boolean")),
                    },
                    _ => Err(cast_failure(&args[0], "einen Boolean")),
                });

        registry.define("zuZeichen", 1, |args| match &args[0] {
                    Value::Char(c) => Ok(Some(Value::Char(*c))),
                    Value::Int(n) => u32::try_from(*n)
                        .ok()
                        .and_then(char::from_u32)
                        .map(|c| Some(Value::Char(c)))
                        .ok_or_else(|| cast_failure(&args[0], "ein Zeichen")),
                    Value::Text(s) => {
                        let mut chars = s.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Ok(Some(Value::Char(c))),
                            _ => Err(cast_failure(&args[0], "ein Zeichen")),
                        }
                    },
                    _ => Err(cast_failure(&args[0], "ein Zeichen")),
                });

        registry.define("länge", 1, |args| match &args[0] {
                    Value::Text(s) => Ok(Some(Value::Int(s.chars().count() as i64))),
                    Value::Array(elements) => Ok(Some(Value::Int(elements.len() as i64))),
                    _ => Err("länge() nimmt eine Zeichenkette oder eine Liste!".to_string()),
                });

        registry.define("minimum", 2, |args| numeric_pair(args, "minimum", f64::min, i64::min));
        registry.define("maximum", 2, |args| numeric_pair(args, "maximum", f64::max, i64::max));

        registry.define("rund", 2, |args| match (&args[0], &args[1]) {
                    (Value::Float(f), Value::Int(digits)) => {
                        let factor = 10f64.powi(*digits as i32);
                        Ok(Some(Value::Float((f * factor).round() / factor)))
                    },
                    _ => Err("rund() nimmt eine Kommazahl und eine Zahl!".to_string()),
                });

        registry
    }
}

/// The shared failure message for the cast built-ins.
fn cast_failure(value: &Value, target: &str) -> String {
    format!("Man kann '{value}' nicht in {target} umwandeln!")
}

/// Applies a numeric two-argument function, staying in Int when both
/// arguments are Ints.
fn numeric_pair(args: &[Value],
                name: &str,
                combine_floats: fn(f64, f64) -> f64,
                combine_ints: fn(i64, i64) -> i64)
                -> NativeResult {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(Value::Int(combine_ints(*a, *b)))),
        _ => match (args[0].as_number(), args[1].as_number()) {
            (Some(a), Some(b)) => Ok(Some(Value::Float(combine_floats(a, b)))),
            _ => Err(format!("{name}() nimmt nur Zahlen!")),
        },
    }
}
