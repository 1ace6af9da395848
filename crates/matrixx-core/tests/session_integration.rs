//! Integration tests for the session controller: chat, interview, and
//! timer teardown across screen changes.

use matrixx_core::{
    EngineSettings, Event, FileCandidate, InterviewStatus, Lane, Role, Route, SessionController,
    SubmitOutcome, Tool,
};

const MB: u64 = 1024 * 1024;

fn controller() -> SessionController {
    SessionController::new(EngineSettings::default())
}

#[test]
fn test_resume_send_flow() {
    let mut ctl = controller();
    ctl.select_tool(Tool::Resume);
    assert_eq!(ctl.chat().messages().len(), 1);

    // Blank send does nothing
    assert!(!ctl.send_message(""));
    assert_eq!(ctl.chat().messages().len(), 1);

    assert!(ctl.send_message("Hi"));
    let messages = ctl.chat().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role(), Role::User);
    assert_eq!(messages[1].content(), "Hi");

    ctl.advance(999);
    assert_eq!(ctl.chat().messages().len(), 2);

    ctl.advance(1);
    let messages = ctl.chat().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role(), Role::System);
    assert!(messages[2].is_revealing());
}

#[test]
fn test_reply_reveal_runs_to_completion() {
    let mut ctl = controller();
    ctl.send_message("hello");
    ctl.advance(1_000);
    ctl.drain_events();

    ctl.advance(120_000);
    let reply = ctl.chat().messages()[1].clone();
    assert!(!reply.is_revealing());
    assert_eq!(ctl.chat().display_text(&reply), reply.content());

    let prefixes: Vec<String> = ctl
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::RevealAdvanced {
                lane: Lane::Transcript,
                revealed,
                ..
            } => Some(revealed),
            _ => None,
        })
        .collect();
    assert_eq!(prefixes.first().map(String::as_str), Some("Thank"));
    assert_eq!(prefixes.last().map(String::as_str), Some(reply.content()));
    assert!(prefixes.windows(2).all(|w| w[0].len() < w[1].len()));
    assert_eq!(ctl.pending_timers(), 0);
}

#[test]
fn test_first_word_visible_after_initial_delay() {
    let mut ctl = controller();
    ctl.select_tool(Tool::Interview);
    let welcome = ctl.chat().messages()[0].clone();

    ctl.advance(149);
    assert_eq!(ctl.chat().display_text(&welcome), "");
    ctl.advance(1);
    assert_eq!(ctl.chat().display_text(&welcome), "Welcome");
    ctl.advance(50);
    assert_eq!(ctl.chat().display_text(&welcome), "Welcome to");
}

#[test]
fn test_tool_switch_mid_reveal_drops_old_chain() {
    let mut ctl = controller();
    ctl.select_tool(Tool::Resume);
    ctl.advance(400);
    ctl.select_tool(Tool::Portfolio);
    ctl.drain_events();

    ctl.advance(60_000);
    let stale = ctl.drain_events().into_iter().any(|e| match e {
        Event::RevealAdvanced { message_id, .. } | Event::RevealCompleted { message_id, .. } => {
            message_id.as_deref() == Some("welcome-resume")
        }
        _ => false,
    });
    assert!(!stale);
    assert_eq!(ctl.chat().messages().len(), 1);
    assert_eq!(ctl.chat().messages()[0].id(), "welcome-portfolio");
}

#[test]
fn test_staging_respects_size_limit() {
    let mut ctl = controller();
    let accepted = ctl.upload_files(vec![
        FileCandidate::new("resume.pdf", "application/pdf", 5 * MB),
        FileCandidate::new("demo.mp4", "video/mp4", 15 * MB),
    ]);
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].name, "resume.pdf");
    assert_eq!(ctl.chat().pending_attachments().len(), 1);

    let id = accepted[0].id.clone();
    assert!(ctl.remove_attachment(&id));
    assert!(!ctl.remove_attachment(&id));
    assert!(ctl.chat().pending_attachments().is_empty());
}

#[test]
fn test_drop_stages_files_and_clears_overlay() {
    let mut ctl = controller();
    let response = ctl.drag_over().unwrap();
    assert!(response.suppress_default);
    assert!(ctl.chat().is_drag_over());

    ctl.drop_files(vec![FileCandidate::new("shot.png", "image/png", 1_024)]);
    assert!(!ctl.chat().is_drag_over());
    assert_eq!(ctl.chat().pending_attachments().len(), 1);

    assert!(ctl.send_message(""));
    assert_eq!(ctl.chat().messages()[0].attachments().len(), 1);
    assert!(ctl.chat().pending_attachments().is_empty());
}

#[test]
fn test_select_chat_and_new_chat() {
    let mut ctl = controller();
    ctl.send_message("pending reply");
    ctl.select_chat("3");
    assert_eq!(ctl.chat().current_chat_id(), Some("3"));
    assert_eq!(ctl.chat().messages().len(), 2);

    // Reply from the previous conversation never lands
    ctl.advance(5_000);
    assert_eq!(ctl.chat().messages().len(), 2);

    ctl.new_chat();
    assert!(ctl.chat().messages().is_empty());
    assert_eq!(ctl.chat().tool(), Tool::General);
    assert_eq!(ctl.chat().current_chat_id(), None);
}

#[test]
fn test_question_selection_bounds() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    assert!(ctl.select_question(4));
    assert!(!ctl.select_question(5));

    let interview = ctl.interview().unwrap();
    assert_eq!(interview.index(), 4);
    assert_eq!(interview.question_count(), 5);
    assert_eq!(interview.progress_pct(), 100.0);
}

#[test]
fn test_countdown_ticks_once_per_second() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    ctl.drain_events();

    ctl.advance(10_000);
    let ticks: Vec<u32> = ctl
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::CountdownTicked { remaining_secs, .. } => Some(remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, (110..120).rev().collect::<Vec<_>>());
    assert_eq!(ctl.interview().unwrap().time_display(), "01:50");
}

#[test]
fn test_next_question_resets_countdown() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    ctl.advance(30_000);
    ctl.set_answer("I would regroup with the team.");
    assert!(ctl.next_question());

    let interview = ctl.interview().unwrap();
    assert_eq!(interview.countdown().unwrap().remaining_seconds, 120);
    assert_eq!(interview.countdown().unwrap().question_id, 2);
    assert_eq!(interview.displayed_question(), "");
}

#[test]
fn test_completing_interview_returns_to_chat() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    for i in 0..4 {
        ctl.set_answer(&format!("answer {i}"));
        assert_eq!(ctl.submit_answer(), SubmitOutcome::Advanced);
    }
    ctl.set_answer("last");
    assert_eq!(ctl.submit_answer(), SubmitOutcome::Completed);

    assert_eq!(ctl.route(), Route::Chat);
    assert!(ctl.interview().is_none());
    assert_eq!(ctl.pending_timers(), 0);
    assert!(ctl
        .events()
        .iter()
        .any(|e| matches!(e, Event::InterviewCompleted { answered: 5, .. })));
}

#[test]
fn test_navigation_tears_down_timers() {
    let mut ctl = controller();
    ctl.select_tool(Tool::CoverLetter);
    ctl.send_message("draft please");
    assert_eq!(ctl.pending_timers(), 2);

    ctl.navigate(Route::Interview);
    assert!(ctl.chat().messages().is_empty());
    // countdown + question reveal only
    assert_eq!(ctl.pending_timers(), 2);

    ctl.navigate(Route::Chat);
    assert_eq!(ctl.pending_timers(), 0);
    ctl.drain_events();
    assert_eq!(ctl.advance(300_000), 0);
    assert!(ctl.drain_events().is_empty());
}

#[test]
fn test_reentering_interview_starts_fresh() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    ctl.set_answer("kept?");
    ctl.select_question(3);
    ctl.navigate(Route::Chat);
    ctl.navigate(Route::Interview);

    let interview = ctl.interview().unwrap();
    assert_eq!(interview.status(), InterviewStatus::InProgress);
    assert_eq!(interview.index(), 0);
    assert_eq!(interview.draft(), "");
    assert!(interview.answers().is_empty());
}

#[test]
fn test_shutdown_fires_nothing_afterwards() {
    let mut ctl = controller();
    ctl.navigate(Route::Interview);
    ctl.advance(500);
    assert!(ctl.pending_timers() > 0);

    ctl.shutdown();
    ctl.drain_events();
    assert_eq!(ctl.advance(600_000), 0);
    assert!(ctl.drain_events().is_empty());
    assert!(ctl.is_closed());
}

#[test]
fn test_events_serialize_with_type_tag() {
    let mut ctl = controller();
    ctl.select_tool(Tool::Resume);
    let json = serde_json::to_value(&ctl.drain_events()[0]).unwrap();
    assert_eq!(json["type"], "ToolSelected");
    assert_eq!(json["tool"], "resume");
}
