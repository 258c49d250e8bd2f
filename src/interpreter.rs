use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{RuntimeError, Signal, Sink};
use crate::expr::{self, Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{self, Stmt, StmtVisitor};
use crate::token::{Token, Type};

type EvalResult = Result<Object, Signal>;
type ExecResult = Result<(), Signal>;

/// Tree-walks the resolved AST, threading a single environment frame stack through every
/// statement and expression. `locals` is the resolver's output: for every `Variable`/`Assign`/
/// `Super` token it has seen, how many frames above the frame active at evaluation time the
/// name is bound at. A token with no entry is global.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    out: Sink,
}

impl Interpreter {
    pub fn new(out: Sink) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::get_globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// Records the scope distance the resolver computed for one `Variable`/`Assign`/`Super`
    /// reference. Called once per reference, before `interpret` ever runs.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(signal) = self.execute(statement) {
                return Err(Self::escaped_signal(signal));
            }
        }

        Ok(())
    }

    /// A `break`/`return` that escapes its syntactic boundary is a bug the resolver should have
    /// caught statically; this only guards against it reaching the top level unconverted.
    fn escaped_signal(signal: Signal) -> RuntimeError {
        match signal {
            Signal::Error(error) => error,
            Signal::Break => RuntimeError {
                token: Token::from("break"),
                message: "Cannot break outside of a loop".to_string(),
            },
            Signal::Return(_) => RuntimeError {
                token: Token::from("return"),
                message: "Cannot return outside of a function".to_string(),
            },
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    /// Pushes `environment`, runs `statements`, and restores the previous environment on every
    /// exit path, including a non-local `break`/`return`/error signal.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn look_up_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn call_value(&mut self, callee: Object, paren: &Token, arguments: Vec<Object>) -> EvalResult {
        match callee {
            Object::Function(f) => {
                Self::check_arity(&f, paren, arguments.len())?;
                Ok(f.call(self, arguments)?)
            }
            Object::NativeFunction(f) => {
                Self::check_arity(&f, paren, arguments.len())?;
                Ok(f.call(self, arguments)?)
            }
            Object::Class(c) => {
                let arity = c.borrow().arity();
                if arguments.len() != arity {
                    return Err(Self::arity_error(paren, arity, arguments.len()).into());
                }
                let instance = c.borrow().call(self, arguments)?;
                Ok(instance)
            }
            other => Err(RuntimeError {
                token: paren.clone(),
                message: format!("Can only call functions and classes, not {}", other.type_str()),
            }.into()),
        }
    }

    fn check_arity(callable: &impl Callable, paren: &Token, got: usize) -> Result<(), RuntimeError> {
        if got != callable.arity() {
            return Err(Self::arity_error(paren, callable.arity(), got));
        }
        Ok(())
    }

    fn arity_error(paren: &Token, expected: usize, got: usize) -> RuntimeError {
        RuntimeError {
            token: paren.clone(),
            message: format!("Expected {expected} arguments but got {got}"),
        }
    }

    /// Invokes a getter immediately when a property read resolves to one; otherwise returns the
    /// value (a field, or a bound method) as-is.
    fn maybe_invoke_getter(&mut self, value: Object, name: &Token) -> EvalResult {
        if let Object::Function(f) = &value {
            if f.is_property {
                return self.call_value(Object::Function(f.clone()), name, vec![]);
            }
        }
        Ok(value)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Sink::stdio(std::io::sink()))
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Literal(literal) = expr else { unreachable!() };
        Ok(Object::from(literal.clone()))
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Variable(variable) = expr else { unreachable!() };
        Ok(self.look_up_variable(&variable.name)?)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.name).copied() {
            Some(distance) => self.environment.borrow_mut().assign_at(distance, &assign.name, value.clone()),
            None => self.globals.borrow_mut().assign(&assign.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Logical(logical) = expr else { unreachable!() };

        let left = self.evaluate(&logical.left)?;

        match logical.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::Or => self.evaluate(&logical.right),
            Type::And if !left.is_truthy() => Ok(left),
            Type::And => self.evaluate(&logical.right),
            _ => unreachable!(),
        }
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            Type::Minus => match right {
                Object::Literal(Literal::Number(n)) => Ok(Object::from(-n)),
                _ => Err(RuntimeError {
                    token: unary.operator.clone(),
                    message: "Operand must be a number".to_string(),
                }.into()),
            },
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let operator = &binary.operator;

        let as_numbers = |l: &Object, r: &Object| match (l, r) {
            (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Some((*l, *r)),
            _ => None,
        };

        match operator.r#type {
            Type::Plus => match (left, right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok(Object::from(l + r)),
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => Ok(Object::from(l + &r)),
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings".to_string(),
                }.into()),
            },
            Type::Minus => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l - r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            Type::Star => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l * r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            Type::Slash => {
                let (l, r) = as_numbers(&left, &right)
                    .ok_or_else(|| -> Signal { RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into() })?;
                if r == 0.0 {
                    return Err(RuntimeError { token: operator.clone(), message: "Division by zero".to_string() }.into());
                }
                Ok(Object::from(l / r))
            }
            Type::Greater => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l > r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            Type::GreaterEqual => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l >= r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            Type::Less => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l < r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            Type::LessEqual => as_numbers(&left, &right)
                .map(|(l, r)| Object::from(l <= r))
                .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers".to_string() }.into()),
            // Equality is total: it never fails, for any pair of runtime values.
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Grouping(grouping) = expr else { unreachable!() };
        self.evaluate(&grouping.expr)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call_value(callee, &call.paren, arguments)
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Get(get) = expr else { unreachable!() };

        let object = self.evaluate(&get.object)?;

        match object {
            Object::Instance(ref instance) => {
                let value = instance.borrow().get(&get.name, &object)?;
                self.maybe_invoke_getter(value, &get.name)
            }
            Object::Class(ref class) => Ok(class.borrow().get_static(&get.name)?),
            _ => Err(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties".to_string(),
            }.into()),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Set(set) = expr else { unreachable!() };

        let object = self.evaluate(&set.object)?;

        match object {
            Object::Instance(instance) => {
                let value = self.evaluate(&set.value)?;
                instance.borrow_mut().set(&set.name, value.clone());
                Ok(value)
            }
            _ => Err(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields".to_string(),
            }.into()),
        }
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Super(super_data) = expr else { unreachable!() };

        let distance = *self.locals.get(&super_data.keyword)
            .expect("resolver resolves every 'super' reference");

        let superclass = self.environment.borrow().get_at(distance, &super_data.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("resolver only binds 'super' to a class value")
        };

        // 'this' lives one frame closer than 'super' in the chain the resolver built:
        // ... -> {"super"} -> {"this"} -> method body.
        let this = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let method = superclass.borrow().get_method(&super_data.method.lexeme).ok_or_else(|| RuntimeError {
            token: super_data.method.clone(),
            message: format!("Undefined property '{}'", super_data.method.lexeme),
        })?;

        Ok(Object::from(method.bind(this)))
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.out, "{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body) {
                Ok(()) => {}
                Err(Signal::Break) => break,
                Err(other) => return Err(other),
            }
        }

        Ok(())
    }

    fn visit_break_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Break(_) = stmt else { unreachable!() };
        Err(Signal::Break)
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Signal::Return(value))
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function::new(
            data.name.clone(),
            data.params.clone(),
            data.body.clone(),
            Rc::clone(&self.environment),
            data.is_initializer,
            data.is_property,
        );

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(expr) => match self.evaluate(expr)? {
                Object::Class(class) => Some(class),
                _ => return Err(RuntimeError {
                    token: data.name.clone(),
                    message: "Superclass must be a class".to_string(),
                }.into()),
            },
            None => None,
        };

        // Static methods have no instance and never see `this`/`super`; build their closures
        // against the environment active before any superclass wrapper frame is pushed.
        let static_methods = Self::build_methods(&self.environment, &data.static_methods);

        let method_environment = match &superclass {
            Some(superclass) => {
                let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                env.borrow_mut().define("super", Object::from(Rc::clone(superclass)));
                env
            }
            None => Rc::clone(&self.environment),
        };
        let methods = Self::build_methods(&method_environment, &data.methods);

        let class = Class::new(data.name.lexeme.clone(), superclass, methods, static_methods);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Rc::new(RefCell::new(class))));

        Ok(())
    }
}

impl Interpreter {
    fn build_methods(closure: &Rc<RefCell<Environment>>, members: &[Stmt]) -> HashMap<String, Function> {
        let mut table = HashMap::new();

        for member in members {
            let stmt::FunctionData { name, params, body, is_initializer, is_property } = match member {
                Stmt::Function(data) => data,
                _ => unreachable!("class members are always Stmt::Function"),
            };

            let function = Function::new(
                name.clone(),
                params.clone(),
                body.clone(),
                Rc::clone(closure),
                *is_initializer,
                *is_property,
            );
            table.insert(name.lexeme.clone(), function);
        }

        table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> String {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");

        let (statements, parse_errors) = Parser::new(tokens).parse();
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");

        let buffer = Rc::new(RefCell::new(Vec::new()));
        let mut interpreter = Interpreter::new(Sink::new(buffer.clone()));

        let resolve_errors = Resolver::new(&mut interpreter).resolve(&statements);
        assert!(resolve_errors.is_empty(), "unexpected resolve errors: {resolve_errors:?}");

        interpreter.interpret(&statements).expect("program to run without a runtime error");

        String::from_utf8(buffer.borrow().clone()).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run("print 1 + 2;"), "3\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run(r#"print "a" + "b";"#), "ab\n");
    }

    #[test]
    fn closures_capture_declaration_time_environment() {
        let out = run(r#"
            var c = 0;
            fun make() {
                fun inc() { c = c + 1; return c; }
                return inc;
            }
            var i = make();
            print i();
            print i();
            print i();
        "#);
        assert_eq!(out, "1\n2\n3\n");
    }

    #[test]
    fn or_short_circuits() {
        let out = run(r#"
            fun side() { print "evaluated"; return true; }
            print true or side();
        "#);
        assert_eq!(out, "true\n");
    }

    #[test]
    fn and_short_circuits() {
        let out = run(r#"
            fun side() { print "evaluated"; return true; }
            print false and side();
        "#);
        assert_eq!(out, "false\n");
    }

    #[test]
    fn break_exits_the_innermost_loop() {
        let out = run("for (var i = 0; i < 3; i = i + 1) { if (i == 2) break; print i; }");
        assert_eq!(out, "0\n1\n");
    }

    #[test]
    fn initializer_always_returns_this() {
        let out = run(r#"
            class Box {
                init(value) { this.value = value; return; }
            }
            print Box(10).value;
        "#);
        assert_eq!(out, "10\n");
    }

    #[test]
    fn inheritance_and_super() {
        let out = run(r#"
            class A { f() { return 1; } }
            class B < A { f() { return super.f() + 1; } }
            print B().f();
        "#);
        assert_eq!(out, "2\n");
    }

    #[test]
    fn method_rebinding_keeps_original_this() {
        let out = run(r#"
            class Thing { getName() { return this.name; } }
            var a = Thing();
            a.name = "a";
            var b = Thing();
            b.name = "b";
            var m = a.getName;
            print m();
        "#);
        assert_eq!(out, "a\n");
    }

    #[test]
    fn getter_is_invoked_on_property_read() {
        let out = run(r#"
            class P { area { return 10 * 10; } }
            print P().area;
        "#);
        assert_eq!(out, "100\n");
    }

    #[test]
    fn equality_never_raises() {
        let out = run(r#"
            print 1 == "1";
            print nil == false;
            print 1 == 1.0;
        "#);
        assert_eq!(out, "false\nfalse\ntrue\n");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let (tokens, _) = Scanner::new("print 1 / 0;").scan_tokens();
        let (statements, _) = Parser::new(tokens).parse();
        let mut interpreter = Interpreter::default();
        Resolver::new(&mut interpreter).resolve(&statements);
        let err = interpreter.interpret(&statements).unwrap_err();
        assert_eq!(err.message, "Division by zero");
    }
}
