use crate::literal::Literal;
use crate::token::Token;

/// An expression produces an [`Object`](crate::object::Object) when evaluated.
///
/// Each variant carries a `*Data` struct with its operands. Dispatch to a
/// [`ExprVisitor`] is by variant tag via [`accept`](Expr::accept), not by virtual call.
///
/// There is no dedicated node for `this`: inside a method body it is scanned and parsed as a
/// plain identifier, and [`Variable`](Expr::Variable) resolves it against the `this` binding
/// the resolver and interpreter inject into every method closure.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Variable(VariableData),
    Assign(AssignData),
    Logical(LogicalData),
    Unary(UnaryData),
    Binary(BinaryData),
    Grouping(GroupingData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    Super(SuperData),
}

impl Expr {
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(_) => visitor.visit_literal_expr(self),
            Expr::Variable(_) => visitor.visit_variable_expr(self),
            Expr::Assign(_) => visitor.visit_assign_expr(self),
            Expr::Logical(_) => visitor.visit_logical_expr(self),
            Expr::Unary(_) => visitor.visit_unary_expr(self),
            Expr::Binary(_) => visitor.visit_binary_expr(self),
            Expr::Grouping(_) => visitor.visit_grouping_expr(self),
            Expr::Call(_) => visitor.visit_call_expr(self),
            Expr::Get(_) => visitor.visit_get_expr(self),
            Expr::Set(_) => visitor.visit_set_expr(self),
            Expr::Super(_) => visitor.visit_super_expr(self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub keyword: Token,
    pub method: Token,
}

/// A tree-walker over [`Expr`] implements this to receive each variant.
pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, expr: &Expr) -> T;
    fn visit_variable_expr(&mut self, expr: &Expr) -> T;
    fn visit_assign_expr(&mut self, expr: &Expr) -> T;
    fn visit_logical_expr(&mut self, expr: &Expr) -> T;
    fn visit_unary_expr(&mut self, expr: &Expr) -> T;
    fn visit_binary_expr(&mut self, expr: &Expr) -> T;
    fn visit_grouping_expr(&mut self, expr: &Expr) -> T;
    fn visit_call_expr(&mut self, expr: &Expr) -> T;
    fn visit_get_expr(&mut self, expr: &Expr) -> T;
    fn visit_set_expr(&mut self, expr: &Expr) -> T;
    fn visit_super_expr(&mut self, expr: &Expr) -> T;
}
