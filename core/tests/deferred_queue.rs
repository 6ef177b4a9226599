use std::cell::RefCell;
use std::rc::Rc;

use aisc_core::lower::{LowerError, LowerErrorKind, LoweringContext};

#[test]
fn jobs_run_last_in_first_out() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut ctx = LoweringContext::new();
    for i in 0..3 {
        let log = Rc::clone(&log);
        ctx.defer(move |_| {
            log.borrow_mut().push(i);
            Ok(())
        });
    }
    assert_eq!(ctx.pending(), 3);

    let ran = ctx.drain().expect("drain should succeed");
    assert_eq!(ran, 3);
    assert_eq!(*log.borrow(), vec![2, 1, 0]);
    assert_eq!(ctx.pending(), 0);
}

#[test]
fn jobs_registered_while_draining_also_run() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut ctx = LoweringContext::new();

    let first = Rc::clone(&log);
    ctx.defer(move |_| {
        first.borrow_mut().push("first");
        Ok(())
    });

    let outer = Rc::clone(&log);
    ctx.defer(move |ctx| {
        outer.borrow_mut().push("outer");
        let inner = Rc::clone(&outer);
        ctx.defer(move |_| {
            inner.borrow_mut().push("inner");
            Ok(())
        });
        Ok(())
    });

    let ran = ctx.drain().expect("drain should succeed");
    assert_eq!(ran, 3);
    assert_eq!(*log.borrow(), vec!["outer", "inner", "first"]);
}

#[test]
fn failing_job_stops_the_drain() {
    let mut ctx = LoweringContext::new();
    let ran_after = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ran_after);
    ctx.defer(move |_| {
        *flag.borrow_mut() = true;
        Ok(())
    });
    ctx.defer(|_| {
        Err(LowerError::new(
            LowerErrorKind::UnsupportedConstruct,
            "boom".to_string(),
            "tests.deferred_queue",
            None,
        ))
    });

    let err = ctx.drain().expect_err("the second job fails");
    assert_eq!(err.kind, LowerErrorKind::UnsupportedConstruct);
    assert!(!*ran_after.borrow());
}

#[test]
fn draining_an_empty_queue_is_a_no_op() {
    let mut ctx = LoweringContext::default();
    assert_eq!(ctx.drain().expect("empty drain"), 0);
}
