use crate::ast::{Expression, Value, Visitor};
use crate::session::Session;
use crate::token::{Token, TokenType};

#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

pub struct Interpreter {}

impl Visitor<Expression, Result<Value, RuntimeError>> for Interpreter {
    fn visit(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Grouping(x) => self.evaluate(x),
            Expression::Unary { operator, right } => {
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::Minus => {
                        let r = check_number_operand(operator, &rv)?;
                        Ok(Value::Number(-r))
                    }
                    TokenType::Ni => Ok(Value::Boolean(!is_truthy(&rv))),
                    _ => Ok(Value::Nil),
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let lv = self.evaluate(left)?;
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::Minus => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Number(l - r))
                    }
                    TokenType::Slash => {
                        // Division by zero keeps float semantics: inf/NaN,
                        // not an error.
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Number(l / r))
                    }
                    TokenType::Star => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Number(l * r))
                    }
                    TokenType::Plus => match (lv, rv) {
                        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                        (Value::String(l), Value::String(r)) => {
                            let mut joined = l;
                            joined.push_str(r.as_str());
                            Ok(Value::String(joined))
                        }
                        _ => Err(RuntimeError {
                            token: operator.clone(),
                            message: String::from(
                                "Operanda morata biti dve števili ali dva niza.",
                            ),
                        }),
                    },
                    TokenType::Vecji => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l > r))
                    }
                    TokenType::VecjiAliEnak => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l >= r))
                    }
                    TokenType::Manjsi => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l < r))
                    }
                    TokenType::ManjsiAliEnak => {
                        let (l, r) = check_number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l <= r))
                    }
                    TokenType::Enak => Ok(Value::Boolean(is_equal(&lv, &rv))),
                    TokenType::NiEnak => Ok(Value::Boolean(!is_equal(&lv, &rv))),
                    _ => Ok(Value::Nil),
                }
            }
        }
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter {}
    }
    pub fn evaluate(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        expr.accept(self)
    }
    /// Top of the pipeline: prints the value, or reports the runtime error
    /// and produces nothing for this input.
    pub fn interpret(&mut self, expr: &Expression, session: &mut Session) {
        match self.evaluate(expr) {
            Ok(value) => println!("{}", value),
            Err(error) => session.runtime_error(&error),
        }
    }
}

fn check_number_operand(operator: &Token, operand: &Value) -> Result<f64, RuntimeError> {
    match operand {
        Value::Number(x) => Ok(*x),
        _ => Err(RuntimeError {
            token: operator.clone(),
            message: String::from("Operand mora biti število."),
        }),
    }
}

fn check_number_operands(
    operator: &Token,
    left: &Value,
    right: &Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError {
            token: operator.clone(),
            message: String::from("Operandi morajo biti števila."),
        }),
    }
}

fn is_truthy(x: &Value) -> bool {
    match x {
        Value::Nil => false,
        Value::Boolean(x) => *x,
        Value::Number(_) => true,
        Value::String(_) => true,
    }
}

fn is_equal(lv: &Value, rv: &Value) -> bool {
    match (lv, rv) {
        (Value::Nil, Value::Nil) => true,
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        _ => false,
    }
}
