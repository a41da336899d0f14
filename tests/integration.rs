//! End-to-end behavior of operator chains, hubs and the async bridges.

use std::{
  sync::{Arc, Mutex},
  thread,
};

use futures::{executor::block_on, StreamExt};
use rxstream::prelude::*;

fn record<S: Observable>(source: S) -> (Arc<Mutex<Vec<Event<S::Item>>>>, Subscription) {
  let events = Arc::new(Mutex::new(Vec::new()));
  let c_events = events.clone();
  let subscription = source.subscribe_event(move |e| c_events.lock().unwrap().push(e));
  (events, subscription)
}

#[test]
fn basic_chain() {
  let result = Arc::new(Mutex::new(Vec::new()));
  let c_result = result.clone();

  observable::from_iter(1..=10)
    .map(|x| x * 2)
    .filter(|&x| x > 10)
    .take(3)
    .subscribe(move |v| c_result.lock().unwrap().push(v));

  assert_eq!(*result.lock().unwrap(), vec![12, 14, 16]);
}

#[test]
fn chain_with_multiple_operators() {
  let result = Arc::new(Mutex::new(Vec::new()));
  let c_result = result.clone();

  observable::from_iter(1..=20)
    .filter(|&x| x % 2 == 0)
    .map(|x| x * x)
    .scan(0, |acc, v| acc + v)
    .take_while(|&x| x < 100)
    .skip(2)
    .subscribe(move |v| c_result.lock().unwrap().push(v));

  // running sums of even squares: 4, 20, 56, 120, ...
  assert_eq!(*result.lock().unwrap(), vec![56]);
}

#[test]
fn merge_of_two_ranges() {
  let (events, _) = record(observable::range(0, 3).merge(observable::range(10, 3)));
  let values: Vec<i64> = events.lock().unwrap().iter().filter_map(|e| e.value().copied()).collect();
  assert_eq!(values.len(), 6);
  assert_eq!(events.lock().unwrap().last(), Some(&Event::Completed));
  let low: Vec<_> = values.iter().copied().filter(|v| *v < 10).collect();
  let high: Vec<_> = values.iter().copied().filter(|v| *v >= 10).collect();
  assert_eq!(low, vec![0, 1, 2]);
  assert_eq!(high, vec![10, 11, 12]);
}

#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
#[test]
fn merge_across_threads_keeps_per_source_order() {
  let pool = ThreadPoolScheduler::default();
  let a = observable::range(0, 100).subscribe_on(pool.clone());
  let b = observable::range(1000, 100).subscribe_on(pool);
  let values = block_on(a.merge(b).to_vec().value()).unwrap();
  assert_eq!(values.len(), 200);
  let low: Vec<_> = values.iter().copied().filter(|v| *v < 1000).collect();
  let high: Vec<_> = values.iter().copied().filter(|v| *v >= 1000).collect();
  assert_eq!(low, (0..100).collect::<Vec<_>>());
  assert_eq!(high, (1000..1100).collect::<Vec<_>>());
}

#[test]
fn zip_of_two_and_three() {
  let source = observable::from_iter(vec![1, 2]).zip(observable::from_iter(vec!["a", "b", "c"]));
  let (events, _) = record(source);
  assert_eq!(
    *events.lock().unwrap(),
    vec![Event::Next((1, "a")), Event::Next((2, "b")), Event::Completed]
  );
}

#[test]
fn retry_three_runs_production_three_times() {
  let runs = Arc::new(Mutex::new(0));
  let c_runs = runs.clone();
  let source = observable::create(move |mut subscriber: Subscriber<i32>| {
    *c_runs.lock().unwrap() += 1;
    subscriber.error(RxError::msg("always failing"));
    Subscription::empty()
  });
  let (events, _) = record(source.retry(3));
  assert_eq!(*runs.lock().unwrap(), 3);
  assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::msg("always failing"))]);
}

#[test]
fn single_cases() {
  let (events, _) = record(observable::from_iter(0..6).single());
  assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::TooManyElements)]);

  let (events, _) = record(observable::empty::<i32>().single());
  assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::EmptySequence)]);

  let (events, _) = record(observable::from_iter(0..6).single_where(|v| *v == 4));
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(4), Event::Completed]);
}

#[test]
fn behavior_seed_reaches_attacher() {
  let subject = BehaviorSubject::new("🔴");
  let (events, _) = record(subject.clone());
  assert_eq!(*events.lock().unwrap(), vec![Event::Next("🔴")]);
}

#[test]
fn replay_one_keeps_latest() {
  let mut subject = ReplaySubject::new(1);
  subject.next("🐶");
  subject.next("🐱");
  let (events, _) = record(subject.clone());
  assert_eq!(*events.lock().unwrap(), vec![Event::Next("🐱")]);
}

#[test]
fn connectable_pre_and_post_connect_attachers() {
  let mut source = PublishSubject::<i32>::new();
  let shared = source.clone().publish();
  let (first, _) = record(shared.clone());
  let (second, _) = record(shared.clone());
  shared.connect();
  source.next(1);
  let (late, _) = record(shared.clone());
  source.next(2);
  source.complete();

  let expected = vec![Event::Next(1), Event::Next(2), Event::Completed];
  assert_eq!(*first.lock().unwrap(), expected);
  assert_eq!(*second.lock().unwrap(), expected);
  assert_eq!(*late.lock().unwrap(), vec![Event::Next(2), Event::Completed]);
}

#[test]
fn nothing_after_terminal_or_cancel() {
  let (events, _) = record(observable::create(|mut subscriber: Subscriber<i32>| {
    subscriber.next(1);
    subscriber.complete();
    subscriber.next(2);
    subscriber.error(RxError::EmptySequence);
    Subscription::empty()
  }));
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Completed]);

  let mut subject = PublishSubject::<i32>::new();
  let (events, subscription) = record(subject.clone());
  subject.next(1);
  subscription.unsubscribe();
  subject.next(2);
  subject.complete();
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(1)]);
}

#[test]
fn concurrent_producers_are_serialized() {
  let subject = PublishSubject::<usize>::new();
  let in_flight = Arc::new(Mutex::new(()));
  let count = Arc::new(Mutex::new(0));
  let (c_in_flight, c_count) = (in_flight.clone(), count.clone());
  subject.clone().subscribe(move |_| {
    let _busy = c_in_flight.try_lock().expect("observer entered concurrently");
    *c_count.lock().unwrap() += 1;
  });

  let producers: Vec<_> = (0..4)
    .map(|t| {
      let mut subject = subject.clone();
      thread::spawn(move || {
        for v in 0..250 {
          subject.next(t * 1000 + v);
        }
      })
    })
    .collect();
  for p in producers {
    p.join().unwrap();
  }
  assert_eq!(*count.lock().unwrap(), 1000);
}

#[test]
fn stream_bridge_yields_values_then_error() {
  let source = observable::from_iter(vec![1, 2]).concat(observable::throw_err(RxError::msg("eof")));
  let collected: Vec<_> = block_on(source.values().collect());
  assert_eq!(collected, vec![Ok(1), Ok(2), Err(RxError::msg("eof"))]);
}

#[tokio::test]
async fn future_bridges() {
  assert_eq!(observable::of(42).value().await, Ok(42));
  assert_eq!(observable::from_iter(0..3).value().await, Err(RxError::TooManyElements));
  assert_eq!(observable::of(5).first_value().await, Ok(Some(5)));
  assert_eq!(observable::from_iter(5..9).first_value().await, Err(RxError::TooManyElements));
  assert_eq!(observable::empty::<i32>().completion().await, Ok(()));
}

#[test]
fn virtual_time_pipeline() {
  TestScheduler::init();
  let (events, _) = record(
    observable::interval(Duration::from_millis(10), TestScheduler)
      .take(4)
      .map(|v| v * 10)
      .delay(Duration::from_millis(5), TestScheduler),
  );
  TestScheduler::advance_by(Duration::from_millis(25));
  assert_eq!(*events.lock().unwrap(), vec![Event::Next(0), Event::Next(10)]);
  TestScheduler::flush();
  assert_eq!(
    *events.lock().unwrap(),
    vec![Event::Next(0), Event::Next(10), Event::Next(20), Event::Next(30), Event::Completed]
  );
}
