//! Text layout of expression components.

use std::fmt;

use super::Expression;

/// Prints every component of an expression.
///
/// - no free index: the scalar
/// - one free index: `(a, b, c)(i)`
/// - two: a bracketed matrix, one row per line
/// - three: bracketed blocks of matrices followed by `(i,j,k)`
/// - more: the flat row-major component list followed by the symbols
pub struct ExpressionDisplay<'a, E: Expression> {
    expr: &'a E,
}

impl<'a, E: Expression> ExpressionDisplay<'a, E> {
    pub(crate) fn new(expr: &'a E) -> Self {
        Self { expr }
    }
}

impl<E: Expression> fmt::Display for ExpressionDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.expr;
        let symbols = e.free_symbols();
        let dims = e.free_dimensions();
        match dims.as_slice() {
            [] => write!(f, "{}", e.component(&[])),
            [n] => {
                write!(f, "(")?;
                for p in 0..*n {
                    if p > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e.component(&[p]))?;
                }
                write!(f, ")({})", symbols[0])
            }
            [rows, cols] => {
                write!(f, "\n[")?;
                for i in 0..*rows {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "[")?;
                    for j in 0..*cols {
                        write!(f, "{}\t", e.component(&[i, j]))?;
                    }
                    write!(f, "]")?;
                    if i + 1 < *rows {
                        writeln!(f)?;
                    }
                }
                writeln!(f, "]")
            }
            [blocks, rows, cols] => {
                write!(f, "\n[")?;
                for i in 0..*blocks {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "[")?;
                    for j in 0..*rows {
                        if j != 0 {
                            write!(f, "  ")?;
                        }
                        write!(f, "[")?;
                        for k in 0..*cols {
                            write!(f, "{}\t", e.component(&[i, j, k]))?;
                        }
                        write!(f, "]")?;
                        if j + 1 < *rows {
                            writeln!(f)?;
                        }
                    }
                    write!(f, "]")?;
                    if i + 1 < *blocks {
                        write!(f, "\n\n")?;
                    }
                }
                writeln!(f, "]({},{},{})", symbols[0], symbols[1], symbols[2])
            }
            _ => {
                let value = e.eval();
                let components = value.value().to_vec();
                write!(f, "(")?;
                for (p, c) in components.iter().enumerate() {
                    if p > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")(")?;
                for (n, s) in symbols.iter().enumerate() {
                    if n > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", s)?;
                }
                write!(f, ")")
            }
        }
    }
}
