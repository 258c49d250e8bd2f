use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::object::{Callable, Object};
use crate::interpreter::Interpreter;
use crate::token::Token;

/// A class value: its name, an optional superclass for single inheritance, its instance method
/// table (getters included, flagged via [`Function::is_property`]), and its static method table.
#[derive(Clone)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
    pub static_methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<RefCell<Class>>>,
        methods: HashMap<String, Function>,
        static_methods: HashMap<String, Function>,
    ) -> Self {
        Class { name, superclass, methods, static_methods }
    }

    /// Looks a method up on this class, then recursively up the superclass chain.
    pub fn get_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        self.superclass.as_ref().and_then(|superclass| superclass.borrow().get_method(name))
    }

    /// Resolves a static member read directly on the class value (`ClassName.member`).
    pub fn get_static(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(method) = self.static_methods.get(&name.lexeme) {
            return Ok(Object::from(method.clone()));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'", name.lexeme),
        })
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} class", self.name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} class", self.name)
    }
}

impl Callable for Class {
    fn arity(&self) -> usize {
        match self.get_method("init") {
            Some(initializer) => initializer.arity(),
            None => 0,
        }
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let instance = Instance::from(&Rc::new(RefCell::new(self.clone())));
        let instance = Rc::new(RefCell::new(instance));

        if let Some(initializer) = self.get_method("init") {
            initializer.bind(Object::from(Rc::clone(&instance))).call(interpreter, arguments)?;
        }

        Ok(Object::from(instance))
    }
}

/// An instance of a [`Class`]: its own mutable field map, plus the class it was constructed
/// from for method and getter lookup.
#[derive(Clone)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    /// Property lookup order: fields, then methods (through the superclass chain). Returns the
    /// bound method as-is; the caller is responsible for immediately invoking it when
    /// [`Function::is_property`] is set, once this borrow of the instance has been released.
    pub fn get(&self, name: &Token, instance: &Object) -> Result<Object, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = self.class.borrow().get_method(&name.lexeme) {
            return Ok(Object::from(method.bind(instance.clone())));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl From<&Rc<RefCell<Class>>> for Instance {
    fn from(value: &Rc<RefCell<Class>>) -> Self {
        Instance { class: Rc::clone(value), fields: HashMap::new() }
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}
