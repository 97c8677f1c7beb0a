//! End to end lowering of assignable expressions, checked against the printed IR.

use lval_core::{
    compile_function,
    decl_engine::{DeclEngineInsert, DeclId},
    language::{
        ty::{
            TyClassDecl, TyExpression, TyExpressionVariant, TyFunctionDecl, TyFunctionParameter,
            TyStructDecl, TySubscriptDecl, TyVarDecl, VarStorage,
        },
        Literal,
    },
    type_system::{TypeId, TypeInfo},
    BuildConfig, Engines,
};
use lval_error::error::CompileError;
use lval_ir::{Context, Module};
use lval_types::{integer_bits::IntegerBits, Ident, Span};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

struct Fixture {
    engines: Engines,
    context: Context,
    module: Module,
    u64_ty: TypeId,
}

impl Fixture {
    fn new() -> Self {
        let engines = Engines::default();
        let mut context = Context::new();
        let module = Module::new(&mut context, "test");
        let u64_ty = engines
            .te()
            .insert(TypeInfo::UnsignedInteger(IntegerBits::SixtyFour));
        Fixture {
            engines,
            context,
            module,
            u64_ty,
        }
    }

    fn var(&self, name: &str, type_id: TypeId, storage: VarStorage) -> DeclId<TyVarDecl> {
        self.engines.de().insert(TyVarDecl {
            name: Ident::new_no_span(name),
            type_id,
            storage,
            span: Span::dummy(),
        })
    }

    fn lvalue_of(&self, type_id: TypeId) -> TypeId {
        self.engines.te().insert_lvalue(type_id)
    }

    fn uint(&self, n: u64) -> TyExpression {
        expr(
            TyExpressionVariant::Literal(Literal::UnsignedInteger(IntegerBits::SixtyFour, n)),
            self.u64_ty,
        )
    }

    // struct Pair { first: u64, second: u64 }
    fn pair(&self) -> (TypeId, DeclId<TyVarDecl>, DeclId<TyVarDecl>) {
        let first = self.var("first", self.u64_ty, VarStorage::Stored);
        let second = self.var("second", self.u64_ty, VarStorage::Stored);
        let decl = self.engines.de().insert(TyStructDecl {
            name: Ident::new_no_span("Pair"),
            members: vec![first, second],
            span: Span::dummy(),
        });
        (self.engines.te().insert(TypeInfo::Struct(decl)), first, second)
    }

    fn function(
        &self,
        name: &str,
        parameters: Vec<TyFunctionParameter>,
        return_type: TypeId,
        locals: Vec<DeclId<TyVarDecl>>,
        body: Option<Vec<TyExpression>>,
    ) -> DeclId<TyFunctionDecl> {
        self.engines.de().insert(TyFunctionDecl {
            name: Ident::new_no_span(name),
            parameters,
            return_type,
            locals,
            body,
            span: Span::dummy(),
        })
    }

    fn compile(&mut self, decl: DeclId<TyFunctionDecl>) -> Result<(), CompileError> {
        self.compile_with(decl, &BuildConfig::default())
    }

    fn compile_with(
        &mut self,
        decl: DeclId<TyFunctionDecl>,
        config: &BuildConfig,
    ) -> Result<(), CompileError> {
        compile_function(&self.engines, &mut self.context, self.module, &decl, config).map(|_| ())
    }
}

/// `class Counters` with a settable `subscript slots(u64)`, a by-value parameter `c` of that
/// class, and `func next_index() -> u64`.
struct Counters {
    class: TypeId,
    slots: DeclId<TySubscriptDecl>,
    next_index: DeclId<TyFunctionDecl>,
    c: DeclId<TyVarDecl>,
}

impl Fixture {
    fn counters(&self, element_type: TypeId) -> Counters {
        let class_decl = self.engines.de().insert(TyClassDecl {
            name: Ident::new_no_span("Counters"),
            members: vec![],
            span: Span::dummy(),
        });
        let class = self.engines.te().insert(TypeInfo::Class(class_decl));
        let slots = self.engines.de().insert(TySubscriptDecl {
            name: Ident::new_no_span("slots"),
            index_type: self.u64_ty,
            element_type,
            settable: true,
            span: Span::dummy(),
        });
        Counters {
            class,
            slots,
            next_index: self.function("next_index", vec![], self.u64_ty, vec![], None),
            c: self.var("c", class, VarStorage::Stored),
        }
    }
}

impl Counters {
    fn params(&self) -> Vec<TyFunctionParameter> {
        vec![TyFunctionParameter {
            var: self.c,
            is_inout: false,
        }]
    }

    fn next_index_call(&self, fx: &Fixture) -> TyExpression {
        expr(
            TyExpressionVariant::FunctionApplication {
                decl: self.next_index,
                arguments: vec![],
            },
            fx.u64_ty,
        )
    }

    // c[index]
    fn subscript(&self, fx: &Fixture, index: TyExpression, element_type: TypeId) -> TyExpression {
        expr(
            TyExpressionVariant::Subscript {
                base: Box::new(expr(TyExpressionVariant::DeclRef(self.c), self.class)),
                decl: self.slots,
                index: Box::new(index),
                substitutions: vec![],
            },
            fx.lvalue_of(element_type),
        )
    }
}

fn expr(expression: TyExpressionVariant, return_type: TypeId) -> TyExpression {
    TyExpression::new(expression, return_type, Span::dummy())
}

fn assign(dest: TyExpression, source: TyExpression, unit: TypeId) -> TyExpression {
    expr(
        TyExpressionVariant::Assign {
            dest: Box::new(dest),
            source: Box::new(source),
        },
        unit,
    )
}

// func read(c: Counters) -> u64 { c[next_index()] }
#[test]
fn subscript_of_reference_retains_base_around_index() {
    let mut fx = Fixture::new();
    let counters = fx.counters(fx.u64_ty);
    let access = counters.subscript(&fx, counters.next_index_call(&fx), fx.u64_ty);
    let read = fx.function(
        "read",
        counters.params(),
        fx.u64_ty,
        vec![],
        Some(vec![access]),
    );
    fx.compile(read).unwrap();

    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn read(c: ref Counters) -> u64 {

        entry:
        retain c
        v0 = call next_index() : u64
        v1 = call slots_subscript_0.get(c, v0) : u64
        release c
        ret u64 v1
    }
    declare fn next_index() -> u64
    declare fn slots_subscript_0.get(ref Counters, u64) -> u64
}
"
    );
}

// func read(c: Counters) -> u64 { c[i] } where `i` is not in scope
#[test]
fn retained_base_is_released_when_index_fails() {
    let mut fx = Fixture::new();
    let counters = fx.counters(fx.u64_ty);
    let i = fx.var("i", fx.u64_ty, VarStorage::Stored);
    let unbound = expr(TyExpressionVariant::DeclRef(i), fx.lvalue_of(fx.u64_ty));
    let access = counters.subscript(&fx, unbound, fx.u64_ty);
    let read = fx.function(
        "read",
        counters.params(),
        fx.u64_ty,
        vec![],
        Some(vec![access]),
    );

    let error = fx.compile(read).unwrap_err();
    assert!(matches!(error, CompileError::InternalOwned(..)));
    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn read(c: ref Counters) -> u64 {

        entry:
        retain c
        release c
    }
}
"
    );
}

// func write(c: Counters) { c[next_index()].first = 5 }
#[test]
fn store_through_subscript_of_reference_writes_back() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let (pair, first, _) = fx.pair();
    let counters = fx.counters(pair);

    let dest = expr(
        TyExpressionVariant::MemberRef {
            base: Box::new(counters.subscript(&fx, counters.next_index_call(&fx), pair)),
            member: first,
            substitutions: vec![],
        },
        fx.lvalue_of(fx.u64_ty),
    );
    let body = vec![assign(dest, fx.uint(5), unit)];
    let write = fx.function("write", counters.params(), unit, vec![], Some(body));
    fx.compile(write).unwrap();

    // The setter call prepares its arguments again: the base is retained and the index is
    // evaluated a second time.
    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn write(c: ref Counters) -> () {
        local mut { u64, u64 } __tmp

        entry:
        retain c
        v0 = call next_index() : u64
        v1 = call slots_subscript_0.get(c, v0) : { u64, u64 }
        release c
        v2 = get_local ptr { u64, u64 }, __tmp
        store v1 to v2
        v3 = elem_addr v2, 0 : ptr u64
        v4 = const u64 5
        store v4 to v3
        v5 = load v2
        retain c
        v6 = call next_index() : u64
        call slots_subscript_0.set(c, v6, v5) : ()
        release c
        v7 = const unit ()
        ret () v7
    }
    declare fn next_index() -> u64
    declare fn slots_subscript_0.get(ref Counters, u64) -> { u64, u64 }
    declare fn slots_subscript_0.set(ref Counters, u64, { u64, u64 }) -> ()
}
"
    );
}

// struct A { pad: u64, norm: u64 { get set } }
// struct B { norm: bool { get set } }
// func both() { var a: A; var b: B; a.norm; b.norm }
#[test]
fn same_named_properties_use_their_own_accessors() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let bool_ty = fx.engines.te().insert(TypeInfo::Boolean);
    let pad = fx.var("pad", fx.u64_ty, VarStorage::Stored);
    let norm_a = fx.var("norm", fx.u64_ty, VarStorage::Computed { settable: true });
    let norm_b = fx.var("norm", bool_ty, VarStorage::Computed { settable: true });
    let struct_type = |name: &str, members| {
        let decl = fx.engines.de().insert(TyStructDecl {
            name: Ident::new_no_span(name),
            members,
            span: Span::dummy(),
        });
        fx.engines.te().insert(TypeInfo::Struct(decl))
    };
    let a_ty = struct_type("A", vec![pad, norm_a]);
    let b_ty = struct_type("B", vec![norm_b]);
    let a = fx.var("a", a_ty, VarStorage::Stored);
    let b = fx.var("b", b_ty, VarStorage::Stored);

    let member_ref = |var, var_ty, member, member_ty| {
        let base = expr(TyExpressionVariant::DeclRef(var), fx.lvalue_of(var_ty));
        expr(
            TyExpressionVariant::MemberRef {
                base: Box::new(base),
                member,
                substitutions: vec![],
            },
            fx.lvalue_of(member_ty),
        )
    };
    let body = vec![
        member_ref(a, a_ty, norm_a, fx.u64_ty),
        member_ref(b, b_ty, norm_b, bool_ty),
    ];
    let both = fx.function("both", vec![], unit, vec![a, b], Some(body));
    fx.compile(both).unwrap();

    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn both() -> () {
        local mut { u64 } a
        local mut {  } b

        entry:
        v0 = get_local ptr { u64 }, a
        v1 = call norm_1.get(v0) : u64
        v2 = get_local ptr {  }, b
        v3 = call norm_2.get(v2) : bool
        v4 = const unit ()
        ret () v4
    }
    declare fn norm_1.get(ptr { u64 }) -> u64
    declare fn norm_2.get(ptr {  }) -> bool
}
"
    );
}

// var origin: Pair { get set }
// func shift() { origin.first = 5 }
#[test]
fn store_through_computed_property_writes_back() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let (pair, first, _) = fx.pair();
    let origin = fx.var("origin", pair, VarStorage::Computed { settable: true });

    let dest = expr(
        TyExpressionVariant::MemberRef {
            base: Box::new(expr(
                TyExpressionVariant::DeclRef(origin),
                fx.lvalue_of(pair),
            )),
            member: first,
            substitutions: vec![],
        },
        fx.lvalue_of(fx.u64_ty),
    );
    let body = vec![assign(dest, fx.uint(5), unit)];
    let shift = fx.function("shift", vec![], unit, vec![], Some(body));
    fx.compile(shift).unwrap();

    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn shift() -> () {
        local mut { u64, u64 } __tmp

        entry:
        v0 = call origin_2.get() : { u64, u64 }
        v1 = get_local ptr { u64, u64 }, __tmp
        store v0 to v1
        v2 = elem_addr v1, 0 : ptr u64
        v3 = const u64 5
        store v3 to v2
        v4 = load v1
        call origin_2.set(v4) : ()
        v5 = const unit ()
        ret () v5
    }
    declare fn origin_2.get() -> { u64, u64 }
    declare fn origin_2.set({ u64, u64 }) -> ()
}
"
    );
}

// var origin: Pair { get set }
// func first_of_origin() -> u64 { origin.first }
#[test]
fn load_through_computed_property_materializes_its_value() {
    let mut fx = Fixture::new();
    let (pair, first, _) = fx.pair();
    let origin = fx.var("origin", pair, VarStorage::Computed { settable: true });

    let access = expr(
        TyExpressionVariant::MemberRef {
            base: Box::new(expr(
                TyExpressionVariant::DeclRef(origin),
                fx.lvalue_of(pair),
            )),
            member: first,
            substitutions: vec![],
        },
        fx.lvalue_of(fx.u64_ty),
    );
    let read = fx.function("first_of_origin", vec![], fx.u64_ty, vec![], Some(vec![access]));
    fx.compile(read).unwrap();

    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn first_of_origin() -> u64 {
        local mut { u64, u64 } __tmp

        entry:
        v0 = call origin_2.get() : { u64, u64 }
        v1 = get_local ptr { u64, u64 }, __tmp
        store v0 to v1
        v2 = elem_addr v1, 0 : ptr u64
        v3 = load v2
        ret u64 v3
    }
    declare fn origin_2.get() -> { u64, u64 }
}
"
    );
}

// func touch() { var p: Pair; p.second = p.second }
#[test]
fn storing_a_loaded_field_back_is_a_no_op() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let (pair, _, second) = fx.pair();
    let p = fx.var("p", pair, VarStorage::Stored);
    let p_second = || {
        expr(
            TyExpressionVariant::MemberRef {
                base: Box::new(expr(TyExpressionVariant::DeclRef(p), fx.lvalue_of(pair))),
                member: second,
                substitutions: vec![],
            },
            fx.lvalue_of(fx.u64_ty),
        )
    };
    let body = vec![assign(p_second(), p_second(), unit)];
    let touch = fx.function("touch", vec![], unit, vec![p], Some(body));
    fx.compile(touch).unwrap();

    // Both sides compute the same element of the same local.
    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn touch() -> () {
        local mut { u64, u64 } p

        entry:
        v0 = get_local ptr { u64, u64 }, p
        v1 = elem_addr v0, 1 : ptr u64
        v2 = load v1
        v3 = get_local ptr { u64, u64 }, p
        v4 = elem_addr v3, 1 : ptr u64
        store v2 to v4
        v5 = const unit ()
        ret () v5
    }
}
"
    );
}

// func bump(n: Node) { n.count = 1 }
#[test]
fn class_field_store_goes_through_reference() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let count = fx.var("count", fx.u64_ty, VarStorage::Stored);
    let class_decl = fx.engines.de().insert(TyClassDecl {
        name: Ident::new_no_span("Node"),
        members: vec![count],
        span: Span::dummy(),
    });
    let node = fx.engines.te().insert(TypeInfo::Class(class_decl));
    let n = fx.var("n", node, VarStorage::Stored);

    let dest = expr(
        TyExpressionVariant::MemberRef {
            base: Box::new(expr(TyExpressionVariant::DeclRef(n), node)),
            member: count,
            substitutions: vec![],
        },
        fx.lvalue_of(fx.u64_ty),
    );
    let bump = fx.function(
        "bump",
        vec![TyFunctionParameter {
            var: n,
            is_inout: false,
        }],
        unit,
        vec![],
        Some(vec![assign(dest, fx.uint(1), unit)]),
    );
    fx.compile(bump).unwrap();

    assert_eq!(
        fx.context.to_string(),
        "module test {
    fn bump(n: ref Node) -> () {

        entry:
        v0 = ref_elem_addr n, count : ptr u64
        v1 = const u64 1
        store v1 to v0
        v2 = const unit ()
        ret () v2
    }
}
"
    );
}

// func get<T>(t: (T, u64)) -> T { t.0 }
#[test]
fn address_only_tuple_element_is_unimplemented() {
    let mut fx = Fixture::new();
    let element = fx
        .engines
        .te()
        .insert(TypeInfo::Archetype(Ident::new_no_span("T")));
    let tuple = fx
        .engines
        .te()
        .insert(TypeInfo::Tuple(vec![element, fx.u64_ty]));
    let t = fx.var("t", tuple, VarStorage::Stored);

    let access = expr(
        TyExpressionVariant::TupleElement {
            base: Box::new(expr(TyExpressionVariant::DeclRef(t), fx.lvalue_of(tuple))),
            index: 0,
        },
        fx.lvalue_of(element),
    );
    let get = fx.function("get", vec![], element, vec![t], Some(vec![access]));
    let error = fx.compile(get).unwrap_err();

    assert!(matches!(error, CompileError::Unimplemented(..)));
    assert!(!error.is_internal());
}

// func bad() { 1 = 2 }
#[test]
#[traced_test]
fn literal_is_not_assignable() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let body = vec![assign(fx.uint(1), fx.uint(2), unit)];
    let bad = fx.function("bad", vec![], unit, vec![], Some(body));

    let error = fx.compile(bad).unwrap_err();
    assert!(matches!(
        error,
        CompileError::UnsupportedLValue {
            kind: "Literal",
            ..
        }
    ));
    assert!(error.is_internal());
    assert!(logs_contain("unsupported lvalue expression `Literal`"));
}

// func answer() -> u64 { var a: u64; a = 42; a }
#[test]
#[traced_test]
fn print_ir_logs_the_module() {
    let mut fx = Fixture::new();
    let unit = fx.engines.te().insert(TypeInfo::Unit);
    let a = fx.var("a", fx.u64_ty, VarStorage::Stored);
    let a_ref = || expr(TyExpressionVariant::DeclRef(a), fx.lvalue_of(fx.u64_ty));
    let body = vec![
        assign(a_ref(), fx.uint(42), unit),
        expr(TyExpressionVariant::Load(Box::new(a_ref())), fx.u64_ty),
    ];
    let answer = fx.function("answer", vec![], fx.u64_ty, vec![a], Some(body));
    fx.compile_with(answer, &BuildConfig::default().print_ir(true))
        .unwrap();

    // The module is logged as one multi-line event, only its first line carries the test scope.
    assert!(logs_contain("module test {"));
    assert!(logs_contain("compiled function"));
    assert!(fx.context.to_string().contains("        ret u64 v3\n"));
}
