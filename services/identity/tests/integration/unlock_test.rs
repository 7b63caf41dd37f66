use biovault_identity::domain::types::{BiometricVerdict, UnlockMethod};
use biovault_identity::error::IdentityServiceError;
use biovault_identity::usecase::unlock::{UnlockInput, UnlockUseCase};

use crate::helpers::{
    MockFacePort, MockUserRepo, MockVoicePort, TEST_PROOF_B64, test_user, test_user_with_voice,
};

fn input(username: &str, method: &str, proof: &str) -> UnlockInput {
    UnlockInput {
        username: username.to_owned(),
        method: UnlockMethod::parse(method),
        proof: proof.to_owned(),
    }
}

#[tokio::test]
async fn should_deny_unknown_user() {
    let uc = UnlockUseCase {
        users: MockUserRepo::empty(),
        face: MockFacePort::accepting(),
        voice: MockVoicePort::accepting(0.9),
    };

    let outcome = uc.execute(input("nobody", "face", TEST_PROOF_B64)).await.unwrap();

    assert!(!outcome.accepted);
    assert_eq!(outcome.confidence, 0.0);
    assert!(outcome.token.is_none());
}

#[tokio::test]
async fn should_unlock_with_accepted_face_and_default_confidence() {
    let face = MockFacePort::accepting();
    let calls = face.calls.clone();
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        face,
        voice: MockVoicePort::accepting(0.9),
    };

    let outcome = uc
        .execute(input("alice", "face", &format!("data:image/jpeg;base64,{TEST_PROOF_B64}")))
        .await
        .unwrap();

    assert!(outcome.accepted);
    assert_eq!(outcome.confidence, 0.96);
    assert!(outcome.token.unwrap().starts_with("token_"));
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "alice");
    assert_eq!(&calls[0].1[..], b"image");
}

#[tokio::test]
async fn should_deny_rejected_face() {
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        face: MockFacePort::rejecting(),
        voice: MockVoicePort::accepting(0.9),
    };

    let outcome = uc.execute(input("alice", "face", TEST_PROOF_B64)).await.unwrap();

    assert!(!outcome.accepted);
    assert_eq!(outcome.confidence, 0.0);
}

#[tokio::test]
async fn should_reject_empty_face_proof() {
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        face: MockFacePort::accepting(),
        voice: MockVoicePort::accepting(0.9),
    };

    let result = uc.execute(input("alice", "face", "")).await;

    assert!(
        matches!(result, Err(IdentityServiceError::BadRequest(_))),
        "expected BadRequest, got {result:?}"
    );
}

#[tokio::test]
async fn should_use_voice_score_as_confidence() {
    let voice = MockVoicePort::accepting(0.83);
    let verified = voice.verified.clone();
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user_with_voice("prof-1")]),
        face: MockFacePort::accepting(),
        voice,
    };

    let outcome = uc.execute(input("alice", "voice", TEST_PROOF_B64)).await.unwrap();

    assert!(outcome.accepted);
    assert_eq!(outcome.confidence, 0.83);
    assert_eq!(*verified.lock().unwrap(), vec!["prof-1".to_owned()]);
}

#[tokio::test]
async fn should_deny_voice_without_enrolled_profile() {
    let voice = MockVoicePort::accepting(0.9);
    let verified = voice.verified.clone();
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        face: MockFacePort::accepting(),
        voice,
    };

    let outcome = uc.execute(input("alice", "voice", TEST_PROOF_B64)).await.unwrap();

    assert!(!outcome.accepted);
    assert!(verified.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_take_fallback_path_for_other_methods() {
    let face = MockFacePort {
        verdict: BiometricVerdict {
            accepted: false,
            score: None,
        },
        ..MockFacePort::accepting()
    };
    let uc = UnlockUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        face,
        voice: MockVoicePort::rejecting(0.1),
    };

    let outcome = uc.execute(input("alice", "pin", "")).await.unwrap();

    assert!(outcome.accepted);
    assert_eq!(outcome.confidence, 0.96);
    assert!(outcome.token.is_some());
}
