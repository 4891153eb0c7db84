use ai_data_analyst::cache::{History, HistoryEntry, PlanCache};
use ai_data_analyst::engine::{analyze, parse_csv, AnalysisResult};
use ai_data_analyst::plan::{AggregateFn, QueryPlan};
use ai_data_analyst::planner::PlanRequest;
use anyhow::Result;

fn request(question: &str) -> PlanRequest {
    let table = parse_csv("cat,amt\nA,10\nB,5\n");
    PlanRequest::from_table(question, &table, 5)
}

#[test]
fn plan_cache_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = PlanCache::new(dir.path().to_path_buf(), 10);
    let key = cache.key_for("https://openrouter.ai/api/v1", "m", &request("totals"));
    assert!(cache.get(&key).is_none());

    let plan = QueryPlan::new("cat", "amt", AggregateFn::Sum);
    cache.set(&key, &plan)?;
    assert_eq!(cache.get(&key), Some(plan));
    Ok(())
}

#[test]
fn cache_key_depends_on_question_and_model() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PlanCache::new(dir.path().to_path_buf(), 10);
    let base = "https://openrouter.ai/api/v1";
    let a = cache.key_for(base, "m", &request("totals"));
    assert_eq!(a, cache.key_for(base, "m", &request("totals")));
    assert_ne!(a, cache.key_for(base, "m", &request("averages")));
    assert_ne!(a, cache.key_for(base, "other", &request("totals")));
}

#[test]
fn plan_cache_prunes_to_length() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = PlanCache::new(dir.path().to_path_buf(), 2);
    let plan = QueryPlan::new("cat", "amt", AggregateFn::Count);
    for key in ["a", "b", "c", "d"] {
        cache.set(key, &plan)?;
    }
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 2);
    Ok(())
}

#[test]
fn corrupt_cache_entry_is_ignored() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = PlanCache::new(dir.path().to_path_buf(), 10);
    std::fs::write(dir.path().join("bad"), "not json")?;
    assert!(cache.get("bad").is_none());
    assert!(!dir.path().join("bad").exists());
    Ok(())
}

#[test]
fn history_is_newest_first_and_capped() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let history = History::new(dir.path().to_path_buf(), 3);
    assert!(history.read()?.is_empty());

    let table = parse_csv("cat,amt\nA,10\nB,5\n");
    for q in ["q1", "q2", "q3", "q4"] {
        let result = analyze(&table, QueryPlan::new("cat", "amt", AggregateFn::Sum));
        history.push(HistoryEntry::new(q, "custom", result))?;
    }
    let entries = history.read()?;
    let questions: Vec<&str> = entries.iter().map(|e| e.question.as_str()).collect();
    assert_eq!(questions, ["q4", "q3", "q2"]);
    assert_eq!(entries[0].result.labels, ["A", "B"]);

    history.clear()?;
    assert!(history.read()?.is_empty());
    Ok(())
}

fn sum_of(csv: &str) -> AnalysisResult {
    analyze(&parse_csv(csv), QueryPlan::new("cat", "amt", AggregateFn::Sum))
}

#[test]
fn infinite_values_keep_history_readable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let history = History::new(dir.path().to_path_buf(), 10);
    history.push(HistoryEntry::new("good", "custom", sum_of("cat,amt\nA,1\n")))?;
    history.push(HistoryEntry::new("inf", "custom", sum_of("cat,amt\nA,Infinity\nB,1e400\nB,-1e400\n")))?;
    history.push(HistoryEntry::new("later", "custom", sum_of("cat,amt\nA,2\n")))?;

    let entries = history.read()?;
    let questions: Vec<&str> = entries.iter().map(|e| e.question.as_str()).collect();
    assert_eq!(questions, ["later", "inf", "good"]);
    let values = entries[1].result.execution().values().to_vec();
    assert_eq!(values[0], f64::INFINITY);
    assert!(values[1].is_nan());
    Ok(())
}

#[test]
fn unreadable_history_is_moved_aside() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let history = History::new(dir.path().to_path_buf(), 10);
    std::fs::write(dir.path().join("history.json"), "[{broken")?;
    assert!(history.read().is_err());

    history.push(HistoryEntry::new("fresh", "custom", sum_of("cat,amt\nA,1\n")))?;
    assert_eq!(history.read()?.len(), 1);
    assert_eq!(std::fs::read_to_string(history.backup_path())?, "[{broken");
    Ok(())
}
