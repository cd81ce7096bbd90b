//! Plain-text export of MQ systems.
//!
//! The format is line oriented:
//!
//! ```text
//! mq-system v1
//! variables 3
//! modulus 17
//! equations 3
//! 0,0:1 1:16 ; 5
//! 1,1:1 2:16 ; 5
//! 2:1 ; 8
//! ```
//!
//! Each equation line lists its quadratic entries `i,j:c`, then its linear
//! entries `i:c`, then `;` and the constant coefficient. Entries appear in
//! canonical monomial order and zero coefficients are omitted, except the
//! constant which is always written.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use super::{Monomial, MqSystem, QuadraticEquation};
use crate::error::{Error, Result};

const MAGIC: &str = "mq-system v1";

impl MqSystem {
    /// Serialize the system in the text exchange format.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parse a system from the text exchange format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the one-based line number on malformed
    /// input, and the usual [`MqSystem::push`] errors for equations that do
    /// not fit the declared header.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, magic) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "empty input"))?;
        if magic != MAGIC {
            return Err(Error::parse(
                line_no,
                format!("expected `{MAGIC}`, found `{magic}`"),
            ));
        }

        let (line_no, num_variables) = header::<usize, _>(&mut lines, line_no, "variables")?;
        let (modulus_line, modulus) = header::<BigUint, _>(&mut lines, line_no, "modulus")?;
        let (_, count) = header::<usize, _>(&mut lines, modulus_line, "equations")?;

        let mut system = MqSystem::new(num_variables, modulus)
            .map_err(|e| Error::parse(modulus_line, e.to_string()))?;

        for (line_no, line) in lines {
            if system.len() == count {
                return Err(Error::parse(
                    line_no,
                    format!("more than the declared {count} equations"),
                ));
            }
            let equation = parse_equation(line, system.modulus())
                .map_err(|message| Error::parse(line_no, message))?;
            system
                .push(equation)
                .map_err(|e| Error::parse(line_no, e.to_string()))?;
        }

        if system.len() != count {
            return Err(Error::parse(
                text.lines().count().max(1),
                format!("declared {count} equations, found {}", system.len()),
            ));
        }
        Ok(system)
    }
}

/// Read a `key value` header line, returning its line number and value.
fn header<'a, T, I>(lines: &mut I, previous: usize, key: &str) -> Result<(usize, T)>
where
    T: FromStr,
    I: Iterator<Item = (usize, &'a str)>,
{
    let (line_no, line) = lines
        .next()
        .ok_or_else(|| Error::parse(previous + 1, format!("missing `{key}` header")))?;
    let value = line
        .strip_prefix(key)
        .map(str::trim)
        .ok_or_else(|| Error::parse(line_no, format!("expected `{key} <value>`")))?;
    value
        .parse()
        .map(|v| (line_no, v))
        .map_err(|_| Error::parse(line_no, format!("invalid {key} value `{value}`")))
}

fn parse_equation(line: &str, p: &BigUint) -> std::result::Result<QuadraticEquation, String> {
    let (body, constant) = line
        .split_once(';')
        .ok_or_else(|| "missing `;` before the constant term".to_string())?;

    let mut equation = QuadraticEquation::new();
    let mut last: Option<Monomial> = None;

    for entry in body.split_whitespace() {
        let (vars, coeff) = entry
            .split_once(':')
            .ok_or_else(|| format!("entry `{entry}` has no coefficient"))?;
        let monomial = match vars.split_once(',') {
            Some((i, j)) => {
                let (i, j) = (index(i)?, index(j)?);
                if i > j {
                    return Err(format!("quadratic entry `{entry}` must list i <= j"));
                }
                Monomial::Quadratic(i, j)
            }
            None => Monomial::Linear(index(vars)?),
        };
        if last.is_some_and(|prev| prev >= monomial) {
            return Err(format!("entry `{entry}` is out of canonical order"));
        }
        last = Some(monomial);

        let coeff = coefficient(coeff, p)?;
        if coeff.is_zero() {
            return Err(format!("entry `{entry}` has a zero coefficient"));
        }
        equation.add_term(monomial, &coeff, p);
    }

    let constant = coefficient(constant.trim(), p)?;
    equation.add_term(Monomial::Constant, &constant, p);
    Ok(equation)
}

fn index(s: &str) -> std::result::Result<usize, String> {
    s.parse()
        .map_err(|_| format!("invalid variable index `{s}`"))
}

fn coefficient(s: &str, p: &BigUint) -> std::result::Result<BigUint, String> {
    let c: BigUint = s
        .parse()
        .map_err(|_| format!("invalid coefficient `{s}`"))?;
    if &c >= p {
        return Err(format!("coefficient {c} is not reduced modulo {p}"));
    }
    Ok(c)
}

impl fmt::Display for MqSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{MAGIC}")?;
        writeln!(f, "variables {}", self.num_variables())?;
        writeln!(f, "modulus {}", self.modulus())?;
        writeln!(f, "equations {}", self.len())?;
        for equation in self.equations() {
            for (monomial, c) in equation.terms() {
                match monomial {
                    Monomial::Quadratic(i, j) => write!(f, "{i},{j}:{c} ")?,
                    Monomial::Linear(i) => write!(f, "{i}:{c} ")?,
                    Monomial::Constant => {}
                }
            }
            writeln!(f, "; {}", equation.coefficient(&Monomial::Constant))?;
        }
        Ok(())
    }
}

impl FromStr for MqSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::FieldContext;
    use crate::instance::AiipInstance;
    use crate::mq::reduce;

    const SAMPLE: &str = "mq-system v1
variables 3
modulus 17
equations 3
0,0:1 1:16 ; 5
1,1:1 2:16 ; 5
2:1 ; 8
";

    #[test]
    fn test_text_matches_reduction() {
        let field = FieldContext::prime(17u32).unwrap();
        let instance = AiipInstance::new(field.clone(), field.element(5), 2).unwrap();
        let system = reduce(&instance, &field.element(9)).unwrap();
        assert_eq!(system.to_text(), SAMPLE);
    }

    #[test]
    fn test_parse_sample() {
        let system: MqSystem = SAMPLE.parse().unwrap();
        assert_eq!(system.num_variables(), 3);
        assert_eq!(system.modulus(), &BigUint::from(17u32));
        assert_eq!(system.len(), 3);
        assert_eq!(
            system.equations()[0].coefficient(&Monomial::Linear(1)),
            BigUint::from(16u32)
        );
        assert_eq!(system.to_text(), SAMPLE);
    }

    #[test]
    fn test_round_trip_extension_field() {
        let field = FieldContext::from_order(27).unwrap();
        let instance = AiipInstance::new(field.clone(), field.element(11), 3).unwrap();
        let y = instance.iterate(&field.element(20)).unwrap();
        let system = reduce(&instance, &y).unwrap();
        let parsed = MqSystem::from_text(&system.to_text()).unwrap();
        assert_eq!(parsed, system);
    }

    #[test]
    fn test_trivial_equation_round_trip() {
        let mut system = MqSystem::new(1, BigUint::from(5u32)).unwrap();
        system.push(QuadraticEquation::new()).unwrap();
        let text = system.to_text();
        assert!(text.ends_with("; 0\n"));
        assert_eq!(MqSystem::from_text(&text).unwrap(), system);
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", 1),
            ("mq-system v2\n", 1),
            ("mq-system v1\nvariables x\n", 2),
            ("mq-system v1\nvariables 2\n", 3),
            ("mq-system v1\nvariables 2\nmodulus 1\nequations 0\n", 3),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n0:1 5\n", 5),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n0:9 ; 1\n", 5),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n1:1 0:1 ; 1\n", 5),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n1,0:1 ; 1\n", 5),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n3:1 ; 1\n", 5),
            ("mq-system v1\nvariables 2\nmodulus 7\nequations 1\n; 1\n; 2\n", 6),
        ];
        for (input, expected_line) in cases {
            match MqSystem::from_text(input) {
                Err(Error::Parse { line, .. }) => {
                    assert_eq!(line, expected_line, "wrong line for {input:?}");
                }
                other => panic!("expected parse error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_equations_rejected() {
        let input = "mq-system v1\nvariables 1\nmodulus 7\nequations 2\n0:1 ; 3\n";
        assert!(matches!(
            MqSystem::from_text(input),
            Err(Error::Parse { .. })
        ));
    }
}
