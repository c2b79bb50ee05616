//! Indented debug dump of the AST

use super::*;
use std::fmt;

const INDENT: usize = 2;

impl Program {
    /// Render the whole program as an indented tree, one node per line
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Render a single statement
    pub fn dump_stmt(&self, stmt: &Stmt) -> String {
        StmtDump { program: self, stmt }.to_string()
    }

    fn write_stmt(&self, f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
        let pad = depth * INDENT;
        match stmt {
            Stmt::Let {
                name,
                mutable,
                init,
                ..
            } => {
                let mutability = if *mutable { "mut " } else { "" };
                writeln!(f, "{:pad$}Let {}{}", "", mutability, name)?;
                if let Some(init) = init {
                    self.write_expr(f, init, depth + 1)?;
                }
                Ok(())
            }
            Stmt::Assign { name, value, .. } => {
                writeln!(f, "{:pad$}Assign {}", "", name)?;
                self.write_expr(f, value, depth + 1)
            }
            Stmt::Expr(expr) => self.write_expr(f, expr, depth),
        }
    }

    fn write_expr(&self, f: &mut fmt::Formatter<'_>, expr: &Expr, depth: usize) -> fmt::Result {
        let pad = depth * INDENT;
        match expr {
            Expr::Literal { value, .. } => match value {
                Literal::Int(n) => writeln!(f, "{:pad$}Int {}", "", n),
                Literal::Float(x) => writeln!(f, "{:pad$}Float {}", "", x),
                Literal::String(s) => writeln!(f, "{:pad$}String {:?}", "", s),
            },
            Expr::Variable { name, .. } => writeln!(f, "{:pad$}Var {}", "", name),
            Expr::Binary {
                op, left, right, ..
            } => {
                writeln!(f, "{:pad$}Binary {}", "", op)?;
                self.write_expr(f, left, depth + 1)?;
                self.write_expr(f, right, depth + 1)
            }
            Expr::Call { name, args, .. } => {
                writeln!(f, "{:pad$}Call {}", "", name)?;
                for arg in args {
                    self.write_expr(f, arg, depth + 1)?;
                }
                Ok(())
            }
            Expr::Lambda(id) => {
                let lambda = self.lambda(*id);
                writeln!(f, "{:pad$}Lambda ({})", "", lambda.params.join(", "))?;
                self.write_expr(f, &lambda.body, depth + 1)
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        for stmt in &self.statements {
            self.write_stmt(f, stmt, 1)?;
        }
        Ok(())
    }
}

/// A statement rendered at depth zero
struct StmtDump<'a> {
    program: &'a Program,
    stmt: &'a Stmt,
}

impl fmt::Display for StmtDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.program.write_stmt(f, self.stmt, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;
    use crate::parser::parse;

    #[test]
    fn test_dump_stmt_starts_unindented() {
        let program = parse(&lex("let s mut = \"hi\"; s = (a) => a % 2;").unwrap()).unwrap();
        assert_eq!(program.dump_stmt(&program.statements[0]), "Let mut s\n  String \"hi\"\n");
        assert_eq!(
            program.dump_stmt(&program.statements[1]),
            "Assign s\n  Lambda (a)\n    Binary %\n      Var a\n      Int 2\n"
        );
    }

    #[test]
    fn test_display_matches_dump() {
        let program = parse(&lex("print(1 + 2);").unwrap()).unwrap();
        assert_eq!(
            format!("{}", program),
            "Program\n  Call print\n    Binary +\n      Int 1\n      Int 2\n"
        );
        assert_eq!(program.dump(), program.to_string());
    }
}
