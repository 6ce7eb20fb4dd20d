use questions_db::{Database, Error, Question, QuestionFollower, QuestionLike, Reply, User};
use tempfile::TempDir;

fn create_temp_db() -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("questions.db")).unwrap();
    db.initialize_schema().unwrap();
    (db, dir)
}

#[test]
fn test_user_and_question_walkthrough() {
    let (db, _dir) = create_temp_db();

    let mut ada = User::new("Ada", "Lovelace");
    ada.save(&db).unwrap();
    assert_eq!(ada.id(), Some(1));
    assert_eq!(User::find_by_name(&db, "Ada", "Lovelace").unwrap(), Some(ada.clone()));

    let mut q1 = Question::new("Q1", "...", 1);
    q1.save(&db).unwrap();
    assert_eq!(q1.id(), Some(1));
    assert_eq!(Question::find_by_author_id(&db, 1).unwrap(), vec![q1.clone()]);
    assert_eq!(q1.author(&db).unwrap(), Some(ada));
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.db");

    {
        let db = Database::open(&path).unwrap();
        db.initialize_schema().unwrap();
        let mut charles = User::new("Charles", "Babbage");
        charles.save(&db).unwrap();
        let mut question = Question::new("Difference engine?", "Does it work?", charles.id().unwrap());
        question.save(&db).unwrap();
        QuestionLike::new(charles.id().unwrap(), question.id().unwrap()).insert(&db).unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));
    let stats = db.stats().unwrap();
    assert_eq!((stats.users, stats.questions, stats.likes), (1, 1, 1));

    let charles = User::find_by_id(&db, 1).unwrap().unwrap();
    assert_eq!(charles.full_name(), "Charles Babbage");
    assert!((charles.average_karma(&db).unwrap() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_threaded_discussion() {
    let (db, _dir) = create_temp_db();

    let mut ada = User::new("Ada", "Lovelace");
    ada.save(&db).unwrap();
    let mut charles = User::new("Charles", "Babbage");
    charles.save(&db).unwrap();
    let (ada_id, charles_id) = (ada.id().unwrap(), charles.id().unwrap());

    let mut question = Question::new("Can machines compose music?", "Asking for a friend.", ada_id);
    question.save(&db).unwrap();
    let qid = question.id().unwrap();

    let mut top = Reply::new(qid, None, charles_id, "Only if told how.");
    top.save(&db).unwrap();
    let mut answer = Reply::reply_to(&top, ada_id, "Notes are just symbols.");
    answer.save(&db).unwrap();

    assert_eq!(top.child_replies(&db).unwrap(), vec![answer.clone()]);
    assert_eq!(answer.parent_reply(&db).unwrap(), Some(top.clone()));
    assert_eq!(answer.question(&db).unwrap(), Some(question.clone()));

    let depths: Vec<usize> = question
        .reply_thread(&db)
        .unwrap()
        .iter()
        .map(|entry| entry.depth)
        .collect();
    assert_eq!(depths, vec![0, 1]);

    QuestionFollower::new(qid, charles_id).insert(&db).unwrap();
    QuestionLike::new(charles_id, qid).insert(&db).unwrap();
    assert_eq!(Question::most_followed(&db, 1).unwrap(), vec![question.clone()]);
    assert_eq!(Question::most_liked(&db, 1).unwrap(), vec![question]);
}

#[test]
fn test_missing_tables_surface_as_storage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("empty.db")).unwrap();

    let err = User::all(&db).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[test]
fn test_not_null_violation_is_constraint_error() {
    let (db, _dir) = create_temp_db();

    let err = db
        .execute("INSERT INTO users (fname, lname) VALUES (?1, NULL)", ["Ada"])
        .unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(_)));
}

#[test]
fn test_unopenable_path_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("questions.db");

    let err = Database::open(&path).err().unwrap();
    assert!(matches!(err, Error::Connection(_)));
}

#[test]
fn test_dangling_references_are_stored() {
    let (db, _dir) = create_temp_db();

    let mut orphan = Question::new("orphan", "nobody asked", 42);
    orphan.save(&db).unwrap();
    QuestionFollower::new(7, 7).insert(&db).unwrap();
    QuestionLike::new(7, orphan.id().unwrap()).insert(&db).unwrap();

    assert_eq!(orphan.author(&db).unwrap(), None);
    assert_eq!(orphan.num_likes(&db).unwrap(), 1);
    assert!(Question::most_followed(&db, 3).unwrap().is_empty());
}

#[test]
fn test_open_existing_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.db");

    let err = Database::open_existing(&path).err().unwrap();
    assert!(matches!(err, Error::Connection(_)));
    assert!(!path.exists());

    let (db, dir) = create_temp_db();
    drop(db);
    let db = Database::open_existing(&dir.path().join("questions.db")).unwrap();
    assert!(User::all(&db).unwrap().is_empty());
}
