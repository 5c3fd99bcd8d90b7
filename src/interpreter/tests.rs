use indoc::indoc;

use super::*;
use crate::parser::{self, ast::Node};

fn run_program(source: &str) -> (Result<Closure, RuntimeError>, String) {
    let program = parser::parse(source).expect("program should parse");
    let mut output = Vec::new();
    let result = Interpreter::new(&mut output).run(&program);
    (result, String::from_utf8(output).expect("utf-8 output"))
}

fn expect_output(source: &str) -> String {
    let (result, output) = run_program(source);
    result.expect("program should run");
    output
}

fn expect_runtime_error(source: &str) -> RuntimeError {
    run_program(source).0.expect_err("program should fail")
}

#[test]
fn prints_values_separated_by_spaces() {
    let output = expect_output(indoc! {"
        x = 4
        y = 'hi'
        print(x, y, True, False, None)
        print()
        print(1 + 2 * 3, (1 + 2) * 3, 7 / 2, -7 / 2)
    "});
    assert_eq!(output, "4 hi True False None\n\n7 9 3 -3\n");
}

#[test]
fn arithmetic_errors_stop_the_program() {
    let (result, output) = run_program(indoc! {"
        print(1)
        x = 1 / 0
        print(2)
    "});
    assert_eq!(result.expect_err("division"), RuntimeError::DivisionByZero);
    assert_eq!(output, "1\n");

    assert_eq!(
        expect_runtime_error("x = 1 + True\n"),
        RuntimeError::UnsupportedOperands {
            operation: "addition".to_string(),
            left: "int".to_string(),
            right: "bool".to_string(),
        }
    );
    assert_eq!(
        expect_runtime_error("x = 1 / None\n"),
        RuntimeError::UnsupportedOperands {
            operation: "division".to_string(),
            left: "int".to_string(),
            right: "NoneType".to_string(),
        }
    );
}

#[test]
fn logical_operators_evaluate_both_sides() {
    assert_eq!(
        expect_runtime_error("x = 0 and (1 / 0)\n"),
        RuntimeError::DivisionByZero
    );
    assert_eq!(
        expect_runtime_error("x = 1 or (1 / 0)\n"),
        RuntimeError::DivisionByZero
    );
    let output = expect_output(indoc! {"
        print(1 and 'x', 0 or '', not None, not 3)
        print(1 < 2 and 2 < 3, 'a' == 'a' or False)
    "});
    assert_eq!(output, "True False True False\nTrue True\n");
}

#[test]
fn compares_primitives() {
    let output = expect_output(indoc! {"
        print(1 < 2, 2 <= 2, 3 > 4, 4 >= 5, 1 == 1, 1 != 1)
        print('abc' < 'abd', 'b' > 'a', False < True, None == None)
    "});
    assert_eq!(output, "True True False False True False\nTrue True True True\n");

    assert_eq!(
        expect_runtime_error("x = 1 < 'a'\n"),
        RuntimeError::CannotCompare {
            operation: "less".to_string(),
            left: "int".to_string(),
            right: "str".to_string(),
        }
    );
}

#[test]
fn if_else_picks_one_branch() {
    let output = expect_output(indoc! {"
        x = 3
        if x > 2:
          print('big')
        else:
          print('small')
        if x > 5:
          print('unreachable')
        if '':
          print('empty strings are false')
        else:
          print('done')
    "});
    assert_eq!(output, "big\ndone\n");
}

#[test]
fn constructs_instances_and_reads_fields() {
    let output = expect_output(indoc! {"
        class Box:
          def __init__(self, v):
            self.v = v
          def get(self):
            return self.v
        b = Box(5)
        print(b.get(), b.v)
        b.v = 6
        print(b.get())
    "});
    assert_eq!(output, "5 5\n6\n");
}

#[test]
fn walks_nested_fields() {
    let output = expect_output(indoc! {"
        class Node:
          def __init__(self):
            self.value = 0
        a = Node()
        a.next = Node()
        a.next.value = 7
        print(a.next.value, a.value)
    "});
    assert_eq!(output, "7 0\n");

    assert_eq!(
        expect_runtime_error("x = 1\ny = x.field\n"),
        RuntimeError::NotAnInstance {
            name: "x".to_string(),
            type_name: "int".to_string(),
        }
    );
    assert_eq!(
        expect_runtime_error("print(missing)\n"),
        RuntimeError::UndefinedVariable {
            name: "missing".to_string()
        }
    );
}

#[test]
fn overridden_methods_win() {
    let output = expect_output(indoc! {"
        class A:
          def f():
            return 1
          def g(self):
            return self.f() + 10
        class B(A):
          def f():
            return 2
        print(A().f(), B().f(), B().g())
    "});
    assert_eq!(output, "1 2 12\n");
}

#[test]
fn return_skips_the_rest_of_the_method() {
    let output = expect_output(indoc! {"
        class Sign:
          def of(self, n):
            if n < 0:
              return 'negative'
              print('unreachable')
            if n == 0:
              return 'zero'
            print('positive path')
            return 'positive'
        s = Sign()
        print(s.of(-3))
        print(s.of(0))
        print(s.of(9))
    "});
    assert_eq!(output, "negative\nzero\npositive path\npositive\n");
}

#[test]
fn methods_without_return_yield_none() {
    let output = expect_output(indoc! {"
        class Quiet:
          def run(self):
            x = 1
        print(Quiet().run())
    "});
    assert_eq!(output, "None\n");
}

#[test]
fn method_scope_is_isolated_from_the_caller() {
    let error = expect_runtime_error(indoc! {"
        class Peek:
          def look(self):
            return outer
        outer = 1
        print(Peek().look())
    "});
    assert_eq!(
        error,
        RuntimeError::UndefinedVariable {
            name: "outer".to_string()
        }
    );

    let (result, _) = run_program(indoc! {"
        class Local:
          def set(self):
            hidden = 5
        Local().set()
    "});
    let globals = result.expect("program should run");
    assert!(!globals.contains("hidden"));
}

#[test]
fn checks_method_arity_and_existence() {
    let source = indoc! {"
        class Pair:
          def __init__(self, a, b):
            self.a = a
        p = Pair(1)
    "};
    assert_eq!(
        expect_runtime_error(source),
        RuntimeError::MethodArityMismatch {
            class: "Pair".to_string(),
            method: "__init__".to_string(),
            expected: 2,
            found: 1,
        }
    );

    let source = indoc! {"
        class Empty:
          def f():
            return 0
        e = Empty()
        e.g()
    "};
    assert_eq!(
        expect_runtime_error(source),
        RuntimeError::UndefinedMethod {
            class: "Empty".to_string(),
            method: "g".to_string(),
        }
    );

    assert_eq!(
        expect_runtime_error("x = 3\nx.f()\n"),
        RuntimeError::MethodOnNonInstance {
            method: "f".to_string(),
            type_name: "int".to_string(),
        }
    );
}

#[test]
fn prints_through_user_str() {
    let output = expect_output(indoc! {"
        class Point:
          def __init__(self, x, y):
            self.x = x
            self.y = y
          def __str__(self):
            return '(' + str(self.x) + ', ' + str(self.y) + ')'
        p = Point(1, 2)
        print(p)
        label = 'at ' + str(p)
        print(label)
        print(str(True) + str(None) + str(12))
    "});
    assert_eq!(output, "(1, 2)\nat (1, 2)\nTrueNone12\n");
}

#[test]
fn prints_instances_and_classes_without_str() {
    let output = expect_output(indoc! {"
        class Plain:
          def f():
            return 0
        print(Plain)
        print(Plain())
    "});
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Class name Plain"));
    let instance = lines.next().expect("instance line");
    assert!(instance.starts_with("0x"), "{instance}");
}

#[test]
fn comparisons_dispatch_to_user_methods() {
    let output = expect_output(indoc! {"
        class Money:
          def __init__(self, cents):
            self.cents = cents
          def __eq__(self, other):
            return self.cents == other.cents
          def __lt__(self, other):
            return self.cents < other.cents
        a = Money(5)
        b = Money(7)
        print(a < b, a > b, a <= b, a >= b, a == b, a != b)
        print(a == Money(5), b >= Money(7))
    "});
    assert_eq!(output, "True False True False False True\nTrue True\n");
}

#[test]
fn instances_without_eq_cannot_be_compared() {
    let error = expect_runtime_error(indoc! {"
        class Plain:
          def f():
            return 0
        p = Plain()
        x = p == p
    "});
    assert_eq!(
        error,
        RuntimeError::CannotCompare {
            operation: "equality".to_string(),
            left: "instance".to_string(),
            right: "instance".to_string(),
        }
    );
}

#[test]
fn constructor_is_optional() {
    let output = expect_output(indoc! {"
        class Bare:
          def f(self):
            return 1
        b = Bare()
        b.extra = 2
        print(b.f() + b.extra)
    "});
    assert_eq!(output, "3\n");
}

#[test]
fn top_level_return_ends_the_program() {
    let (result, output) = run_program(indoc! {"
        print(1)
        return 2
        print(3)
    "});
    assert!(result.is_ok());
    assert_eq!(output, "1\n");
}

#[test]
fn returns_the_global_scope() {
    let (result, _) = run_program(indoc! {"
        b = 2
        a = 'one'
        c = b > 1
    "});
    let globals = result.expect("program should run");
    assert_eq!(globals.to_string(), "a: one\nb: 2\nc: True\n");
}

#[test]
fn literal_nodes_hand_out_the_same_object() {
    let node = Node::number(42);
    let mut output = Vec::new();
    let mut interpreter = Interpreter::new(&mut output);
    let mut scope = Closure::new();
    let mut evaluate = |interpreter: &mut Interpreter<'_>| match interpreter
        .eval(&node, &mut scope)
        .expect("constant")
    {
        Completion::Normal(value) => value,
        Completion::Return(_) => panic!("constants never return"),
    };
    let first = evaluate(&mut interpreter);
    let second = evaluate(&mut interpreter);
    assert!(first.ptr_eq(&second));
    assert_eq!(first.as_number(), Some(42));
}

#[test]
fn output_written_before_an_error_is_kept() {
    let (result, output) = run_program(indoc! {"
        class Counter:
          def __init__(self):
            self.n = 0
          def bump(self):
            self.n = self.n + 1
            print(self.n)
            return self.n / (3 - self.n)
        c = Counter()
        c.bump()
        c.bump()
        c.bump()
    "});
    assert_eq!(result.expect_err("third bump"), RuntimeError::DivisionByZero);
    assert_eq!(output, "1\n2\n3\n");
}
