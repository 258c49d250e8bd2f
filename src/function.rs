use std::fmt::Debug;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Signal};
use crate::interpreter::Interpreter;
use crate::object::{Object, Callable};
use crate::stmt::Stmt;
use crate::token::{Token, Type};
use crate::literal::Literal;

/// A user-defined function or method.
///
/// `closure` is the environment frame visible where the function was declared (or, for a
/// method, the frame holding `super` if its class has one). `is_initializer` marks a class's
/// `init` method, whose calls always yield `this` regardless of what they `return`.
/// `is_property` marks a getter: invoked immediately on property read rather than returned as a
/// bound callable.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
    pub is_property: bool,
}

impl Function {
    pub fn new(
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
        is_property: bool,
    ) -> Self {
        Function { name, params, body, closure, is_initializer, is_property }
    }

    /// Returns a copy of this function whose closure has a fresh frame defining `this` as the
    /// given instance. Looking a method up on an instance always re-binds it this way, so a
    /// method retrieved and invoked separately from its instance still sees the right `this`.
    pub fn bind(&self, instance: Object) -> Function {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        environment.borrow_mut().define("this", instance);

        Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: self.body.clone(),
            closure: environment,
            is_initializer: self.is_initializer,
            is_property: self.is_property,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        self.params.iter().zip(arguments.iter()).for_each(|(param, arg)| {
            environment.define(&param.lexeme, arg.to_owned());
        });

        let environment = Rc::new(RefCell::new(environment));

        match interpreter.execute_block(&self.body, Rc::clone(&environment)) {
            Ok(()) => {
                if self.is_initializer {
                    return environment.borrow().get_at(1, &Token::from("this"));
                }
                Ok(Object::from(Literal::Nil))
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    return environment.borrow().get_at(1, &Token::from("this"));
                }
                Ok(value)
            }
            Err(Signal::Break) => unreachable!("resolver guarantees break cannot escape a loop into a call"),
            Err(Signal::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter().map(|p| p.lexeme.as_str()).collect::<Vec<_>>().join(", ");
        write!(f, "<fn {}({})>", self.name.lexeme, params)
    }
}

/// A host function exposed to Lox code as a global (`clock`, `len`, `input`).
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl NativeFunction {
    /// Builtins injected into the global frame before a program runs.
    pub fn get_globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: Token::from("clock"),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap()
                        .as_secs_f64();
                    Ok(Object::from(now))
                },
            },
            NativeFunction {
                name: Token::from("len"),
                arity: 1,
                function: |_, arguments| {
                    match &arguments[0] {
                        Object::Literal(Literal::String(s)) => Ok(Object::from(s.chars().count() as f64)),
                        other => Err(RuntimeError {
                            token: Token::from("len"),
                            message: format!("Type {} does not have a length", other.type_str()),
                        }),
                    }
                },
            },
            NativeFunction {
                name: Token::from("input"),
                arity: 0,
                function: |_, _| {
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input).unwrap();
                    while input.ends_with('\n') || input.ends_with('\r') {
                        input.pop();
                    }
                    Ok(Object::from(input))
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn native {}>", self.name.lexeme)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn native {}>", self.name.lexeme)
    }
}
