use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use llm_evals::{
    aggregate, evaluate, generate_answers, generate_questions, pair_up, EvalError, Judgment,
    PromptClient, QAPair,
};
use proptest::prelude::*;

/// Client whose latency for the item tagged `#i` comes from `delays[i]`.
struct DelayedClient {
    delays: Vec<u64>,
    calls: AtomicUsize,
    reply: fn(usize, &str) -> String,
}

fn tag(prompt: &str) -> usize {
    prompt
        .rsplit('#')
        .next()
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

#[async_trait]
impl PromptClient for DelayedClient {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index = tag(prompt);
        let delay = self.delays.get(index).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok((self.reply)(index, prompt))
    }

    fn name(&self) -> &str {
        "delayed"
    }
}

fn delayed(delays: Vec<u64>, reply: fn(usize, &str) -> String) -> Arc<DelayedClient> {
    Arc::new(DelayedClient {
        delays,
        calls: AtomicUsize::new(0),
        reply,
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn answers_align_under_any_latency(delays in proptest::collection::vec(0u64..500, 0..24)) {
        let questions: Vec<String> = (0..delays.len()).map(|i| format!("question #{i}")).collect();
        let client = delayed(delays, |i, _| format!("answer #{i}"));

        let answers = runtime().block_on(generate_answers(client, &questions)).unwrap();

        prop_assert_eq!(answers.len(), questions.len());
        for (i, answer) in answers.iter().enumerate() {
            prop_assert_eq!(answer, &format!("answer #{i}"));
        }
    }

    #[test]
    fn judgments_align_under_any_latency(delays in proptest::collection::vec(0u64..500, 0..24)) {
        let pairs: Vec<QAPair> = (0..delays.len())
            .map(|i| QAPair::new(format!("q #{i}"), format!("a #{i}")))
            .collect();
        let judge = delayed(delays, |i, _| format!("Score: {}\nNotes: item {i}", i % 5 + 1));

        let judgments = runtime()
            .block_on(evaluate(&pairs, "{question} / {answer}", judge))
            .unwrap();

        prop_assert_eq!(judgments.len(), pairs.len());
        for (i, judgment) in judgments.iter().enumerate() {
            prop_assert_eq!(judgment, &Judgment::new(Some((i % 5 + 1) as u8), format!("item {i}")));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn full_run_through_public_api() {
    let generator = delayed(vec![], |_, _| "1. What is entropy?".to_string());
    let questions = generate_questions(generator.clone(), "physics", 3).await.unwrap();
    assert_eq!(questions, vec!["What is entropy?"; 3]);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);

    let tagged: Vec<String> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{q} #{i}"))
        .collect();
    let answerer = delayed(vec![300, 200, 100], |i, _| format!("disorder #{i}"));
    let answers = generate_answers(answerer, &tagged).await.unwrap();
    let pairs = pair_up(&tagged, &answers).unwrap();

    let judge_a = delayed(vec![50, 10, 30], |i, _| match i {
        0 => "Score: 4\nNotes: solid answer".to_string(),
        1 => "This answer is decent but hard to rate.".to_string(),
        _ => "I'd give this a 2.".to_string(),
    });
    let judge_b = delayed(vec![], |_, _| "Score: 5".to_string());

    let (a, b) = tokio::join!(
        evaluate(&pairs, "{question}\n{answer}", judge_a),
        evaluate(&pairs, "{question}\n{answer}", judge_b)
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert_eq!(a[0], Judgment::new(Some(4), "solid answer"));
    assert_eq!(a[1].score, None);
    assert_eq!(a[1].notes, "This answer is decent but hard to rate.");
    assert_eq!(a[2].score, Some(2));
    assert_eq!(aggregate(&a), 3.0);
    assert_eq!(aggregate(&b), 5.0);
}

#[tokio::test]
async fn empty_inputs_make_no_calls() {
    let client = delayed(vec![], |_, _| String::new());
    assert!(generate_questions(client.clone(), "x", 0).await.unwrap().is_empty());
    assert!(evaluate(&[], "{answer}", client.clone()).await.unwrap().is_empty());
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}
