//! Statement executor and scope resolver
//!
//! Function calls run in two explicit passes: a hoisting pre-scan that
//! registers every `var` name in the body, then statement execution. This
//! keeps declaration hoisting visible in the control flow instead of
//! depending on binding-creation order.

use super::env::{assign, child_env, visible_names, EnvRef, Environment};
use super::error::{ErrorKind, InterpResult, RuntimeError};
use super::value::{loose_equals, strict_equals, Function, Value};
use crate::ast::{AssignTarget, CmpOp, Expr, Literal, Program, Spanned, Stmt};
use crate::util::suggest_name;
use std::rc::Rc;

/// Maximum call depth before the executor refuses to recurse further
const MAX_RECURSION_DEPTH: usize = 4096;

/// Stack growth parameters for deeply nested trees
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024; // Grow by 2MB each time

/// The statement executor
pub struct Interpreter {
    /// Root (global) environment, explicit per instance so callers and
    /// tests get isolated scopes rather than a process singleton
    root_env: EnvRef,
    /// Current call depth
    recursion_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            root_env: Environment::new().into_ref(),
            recursion_depth: 0,
        }
    }

    /// The persistent root scope of this interpreter instance
    pub fn root_env(&self) -> EnvRef {
        Rc::clone(&self.root_env)
    }

    /// Run a whole program against the root environment. A top-level
    /// `return` behaves like reaching the end of the script.
    pub fn run(&mut self, program: &Program) -> InterpResult<Value> {
        let env = self.root_env();
        match self.execute(&program.body, &env) {
            Err(e) => match e.kind {
                ErrorKind::Return(value) => Ok(*value),
                _ => Err(e),
            },
            ok => ok,
        }
    }

    /// Execute a statement list against `env`. The completion value is the
    /// value of the last expression statement, undefined if there was none.
    pub fn execute(&mut self, stmts: &[Spanned<Stmt>], env: &EnvRef) -> InterpResult<Value> {
        let mut completion = Value::Undefined;
        for stmt in stmts {
            if let Some(value) = self.exec_stmt(stmt, env)? {
                completion = value;
            }
        }
        Ok(completion)
    }

    /// Permissive safe-read tier: undefined instead of a reference-missing
    /// error. Hosts implementing the `typeof`-style idiom sit on this;
    /// plain identifier evaluation stays strict.
    pub fn safe_read(&self, env: &EnvRef, name: &str) -> Value {
        env.borrow().get(name).unwrap_or(Value::Undefined)
    }

    /// `typeof` over the safe-read tier: never errors, "undefined" for an
    /// unbound name.
    pub fn type_of(&self, env: &EnvRef, name: &str) -> &'static str {
        self.safe_read(env, name).type_name()
    }

    fn exec_stmt(&mut self, stmt: &Spanned<Stmt>, env: &EnvRef) -> InterpResult<Option<Value>> {
        match &stmt.node {
            Stmt::VarDecl { name, init } => {
                // the hoisting pass already registered function-local names;
                // top-level declarations register here
                env.borrow_mut().declare_local(name);
                if let Some(init) = init {
                    let value = self.eval(init, env)?;
                    // the name is known local: write this environment's own
                    // slot, not the chain
                    env.borrow_mut().define_local(name.clone(), value);
                }
                Ok(None)
            }
            Stmt::Assign { target, value } => {
                let value = self.eval(value, env)?;
                match target {
                    // chain-search-or-create-in-root: this is how a bare
                    // assignment inside a function becomes a global
                    AssignTarget::Name(name) => assign(env, name, value),
                    AssignTarget::Property { object, name } => {
                        let receiver = self.eval(object, env)?;
                        // permissive like property reads: a write through a
                        // non-object receiver is dropped
                        receiver.set_property(name.clone(), value);
                    }
                }
                Ok(None)
            }
            Stmt::Expr(expr) => Ok(Some(self.eval(expr, env)?)),
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Undefined,
                };
                Err(RuntimeError::returning(value))
            }
            Stmt::Block(stmts) => {
                // statement grouping only; vars are function-scoped
                for stmt in stmts {
                    self.exec_stmt(stmt, env)?;
                }
                Ok(None)
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond, env)?.is_truthy() {
                    self.exec_stmt(then_branch, env)?;
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, env)?;
                }
                Ok(None)
            }
            Stmt::While { cond, body } => {
                while self.eval(cond, env)?.is_truthy() {
                    self.exec_stmt(body, env)?;
                }
                Ok(None)
            }
        }
    }

    /// Evaluate an expression, growing the stack for deeply nested trees
    fn eval(&mut self, expr: &Spanned<Expr>, env: &EnvRef) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, env: &EnvRef) -> InterpResult<Value> {
        match &expr.node {
            Expr::Literal(lit) => Ok(literal_value(lit)),

            Expr::Ident(name) => {
                let found = env.borrow().get(name);
                found.ok_or_else(|| {
                    let candidates = visible_names(env);
                    let suggestion = suggest_name(name, &candidates);
                    RuntimeError::reference_missing(name, suggestion.as_deref()).at(expr.span)
                })
            }

            Expr::Property { object, name } => {
                let receiver = self.eval(object, env)?;
                // missing property or non-object receiver reads undefined
                Ok(receiver.get_property(name))
            }

            Expr::ObjectLit(fields) => {
                let obj = Value::new_object();
                for (name, field_expr) in fields {
                    let value = self.eval(field_expr, env)?;
                    obj.set_property(name.clone(), value);
                }
                Ok(obj)
            }

            Expr::Function { params, body } => Ok(Value::Function(Rc::new(Function {
                params: params.clone(),
                body: body.clone(),
                // lexical scoping: capture the defining environment
                env: Rc::clone(env),
            }))),

            Expr::Call { callee, args } => {
                let callee_span = callee.span;
                let target = self.eval(callee, env)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval(arg, env)?);
                }
                match target {
                    Value::Function(func) => self
                        .call_function(&func, arg_values)
                        .map_err(|e| e.at(expr.span)),
                    other => Err(RuntimeError::not_callable(other.type_name()).at(callee_span)),
                }
            }

            Expr::Compare { op, left, right } => {
                let lval = self.eval(left, env)?;
                let rval = self.eval(right, env)?;
                let eq = match op {
                    CmpOp::LooseEq | CmpOp::LooseNe => loose_equals(&lval, &rval),
                    CmpOp::StrictEq | CmpOp::StrictNe => strict_equals(&lval, &rval),
                };
                let result = match op {
                    CmpOp::LooseEq | CmpOp::StrictEq => eq,
                    CmpOp::LooseNe | CmpOp::StrictNe => !eq,
                };
                Ok(Value::Bool(result))
            }
        }
    }

    /// Call a function value. The call environment's parent is the one the
    /// function captured at its definition site, not the caller's; it is
    /// dropped on every exit path when the last reference goes at return.
    pub fn call_function(&mut self, func: &Function, args: Vec<Value>) -> InterpResult<Value> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            return Err(RuntimeError::stack_overflow());
        }

        let call_env = child_env(&func.env);
        {
            let mut env = call_env.borrow_mut();
            // missing arguments bind to undefined, extras are dropped
            let mut args = args.into_iter();
            for param in &func.params {
                let value = args.next().unwrap_or(Value::Undefined);
                env.define_local(param.clone(), value);
            }
        }

        // hoisting pass: every var in the body exists before any statement
        hoist_declarations(&func.body, &call_env);

        // execution pass; return unwinds as control flow, falling off the
        // end yields undefined
        let result = match self.execute(&func.body, &call_env) {
            Ok(_) => Ok(Value::Undefined),
            Err(e) => match e.kind {
                ErrorKind::Return(value) => Ok(*value),
                _ => Err(e),
            },
        };
        self.recursion_depth -= 1;
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Undefined => Value::Undefined,
        Literal::Null => Value::Null,
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(f) => Value::Float(*f),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Str(s) => Value::str(s.clone()),
    }
}

/// Register every `var` name a function body declares, before execution.
/// Recurses through blocks and if/while bodies (`var` is function-scoped)
/// but not into nested function definitions, which hoist into their own
/// calls.
fn hoist_declarations(stmts: &[Spanned<Stmt>], env: &EnvRef) {
    for stmt in stmts {
        hoist_stmt(&stmt.node, env);
    }
}

fn hoist_stmt(stmt: &Stmt, env: &EnvRef) {
    match stmt {
        Stmt::VarDecl { name, .. } => env.borrow_mut().declare_local(name),
        Stmt::Block(stmts) => hoist_declarations(stmts, env),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            hoist_stmt(&then_branch.node, env);
            if let Some(else_branch) = else_branch {
                hoist_stmt(&else_branch.node, env);
            }
        }
        Stmt::While { body, .. } => hoist_stmt(&body.node, env),
        Stmt::Assign { .. } | Stmt::Expr(_) | Stmt::Return(_) => {}
    }
}
