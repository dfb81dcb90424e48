//! Contract self-test
//!
//! Exercises the public store contract against a scratch directory and
//! collects every outcome in a [`TestReport`] that is threaded through each
//! test and handed back to the caller.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, TextBookError};
use crate::textbook::TextBook;
use crate::traits::{FeedPost, PostStore};

const ADA: &str = "AdaLovelace";
const ADA_TEXT: &str = "I am much pleased to find how very well I stand work and how my powers of attention and continued effort increase.";
const GRACE: &str = "GraceHopper";
const GRACE_TEXT: &str = "One accurate measurement is worth a thousand expert opinions.";
const GRACE_REPLY: &str = "The only phrase I've ever disliked is, 'Why, we've always done it that way.'";
const KATHERINE: &str = "KatherineJohnson";
const KATHERINE_TEXT: &str = "Girls are capable of doing everything men are capable of doing.";
const KATHERINE_REPLY: &str = "I like to learn. That's an art and a science.";

// =============================================================================
// Report
// =============================================================================

/// Outcome of a single subtest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed { expected: String, actual: String },
}

/// A named subtest and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtest {
    pub name: String,
    pub outcome: Outcome,
}

/// Accumulates subtest outcomes
#[derive(Debug, Clone, Default)]
pub struct TestReport {
    subtests: Vec<Subtest>,
}

impl TestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, name: impl Into<String>) {
        self.subtests.push(Subtest {
            name: name.into(),
            outcome: Outcome::Passed,
        });
    }

    pub fn fail(&mut self, name: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) {
        self.subtests.push(Subtest {
            name: name.into(),
            outcome: Outcome::Failed {
                expected: expected.into(),
                actual: actual.into(),
            },
        });
    }

    /// Record a pass if `ok`, otherwise a failure with the lazily built actual value
    pub fn check(
        &mut self,
        name: impl Into<String>,
        ok: bool,
        expected: impl Into<String>,
        actual: impl FnOnce() -> String,
    ) -> bool {
        if ok {
            self.pass(name);
        } else {
            self.fail(name, expected, actual());
        }
        ok
    }

    /// Record an unexpected error as a failure
    pub fn error(&mut self, name: impl Into<String>, err: &TextBookError) {
        self.fail(name, "no error", err.to_string());
    }

    /// Append all of `other`'s outcomes
    pub fn merge(&mut self, other: TestReport) {
        self.subtests.extend(other.subtests);
    }

    pub fn subtests(&self) -> &[Subtest] {
        &self.subtests
    }

    pub fn failures(&self) -> impl Iterator<Item = &Subtest> {
        self.subtests
            .iter()
            .filter(|s| s.outcome != Outcome::Passed)
    }

    pub fn passed(&self) -> usize {
        self.subtests
            .iter()
            .filter(|s| s.outcome == Outcome::Passed)
            .count()
    }

    pub fn total(&self) -> usize {
        self.subtests.len()
    }

    pub fn is_success(&self) -> bool {
        self.passed() == self.total()
    }

    /// `Passed X of Y tests (Z%)`
    pub fn summary(&self) -> String {
        let percent = if self.total() == 0 {
            100.0
        } else {
            self.passed() as f64 * 100.0 / self.total() as f64
        };
        format!(
            "Passed {} of {} tests ({:.1}%)",
            self.passed(),
            self.total(),
            percent
        )
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for subtest in &self.subtests {
            match &subtest.outcome {
                Outcome::Passed => writeln!(f, "    {}", subtest.name)?,
                Outcome::Failed { expected, actual } => {
                    writeln!(f, "    (error): {}", subtest.name)?;
                    writeln!(f, "        --> expected: {}", expected)?;
                    writeln!(f, "        -->   actual: {}", actual)?;
                }
            }
        }
        write!(f, "\n{}", self.summary())
    }
}

// =============================================================================
// Suite
// =============================================================================

type TestFn = fn(&Path, &mut TestReport) -> Result<()>;

const SUITE: &[(&str, TestFn)] = &[
    ("Constructor", test_constructor),
    ("AddPost", test_add_post),
    ("RemovePost", test_remove_post),
    ("AddComment", test_add_comment),
    ("LastId", test_last_id),
    ("PostCount", test_post_count),
    ("PostString", test_post_string),
    ("Render", test_render),
    ("Posts", test_posts),
];

/// Run the whole suite, one fresh store directory per test under `dir`
///
/// An error escaping a test is recorded as a failure of that test and the
/// suite continues.
pub fn run(dir: &Path) -> TestReport {
    let mut report = TestReport::new();
    for (name, test) in SUITE {
        let scratch = dir.join(name);
        if let Err(e) = test(&scratch, &mut report) {
            report.error(format!("{} - completes", name), &e);
        }
        let _ = fs::remove_dir_all(&scratch);
    }
    report
}

fn config_for(dir: &Path) -> Config {
    Config::builder()
        .data_dir(dir)
        .sync_strategy(SyncStrategy::OsBuffered)
        .build()
}

/// Wipe `dir` and open an empty store in it
fn fresh(dir: &Path) -> Result<TextBook> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    TextBook::open(config_for(dir))
}

fn reopen(dir: &Path) -> Result<TextBook> {
    TextBook::open(config_for(dir))
}

fn seed(textbook: &mut TextBook) -> Result<()> {
    textbook.add_post(ADA, ADA_TEXT)?;
    textbook.add_post(KATHERINE, KATHERINE_TEXT)?;
    textbook.add_post(GRACE, GRACE_TEXT)?;
    Ok(())
}

fn test_constructor(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "Constructor";
    let mut textbook = fresh(dir)?;
    report.check(
        format!("{} - new store without index", name),
        textbook.post_count() == 0 && textbook.last_id() == 0,
        "0 posts, last id 0",
        || format!("{} posts, last id {}", textbook.post_count(), textbook.last_id()),
    );

    seed(&mut textbook)?;
    textbook.add_comment(0, GRACE, GRACE_REPLY)?;
    textbook.add_comment(0, KATHERINE, KATHERINE_REPLY)?;
    textbook.add_comment(2, ADA, ADA_TEXT)?;

    let recovered = reopen(dir)?;
    let subtest = format!("{} - recovering store from files", name);
    let authors: Vec<String> = recovered.iter().map(|p| p.author().to_string()).collect();
    let first = recovered.post_string(0).unwrap_or_default();
    let third = recovered.post_string(2).unwrap_or_default();
    let ok = recovered.post_count() == 3
        && recovered.last_id() == 3
        && authors == [ADA, KATHERINE, GRACE]
        && first.contains(GRACE_REPLY)
        && first.contains(KATHERINE_REPLY)
        && third.contains(ADA_TEXT);
    report.check(subtest, ok, "3 posts by Ada, Katherine, Grace with comments", || {
        format!("{} posts {:?}", recovered.post_count(), authors)
    });

    report.check(
        format!("{} - recovered posts are identical", name),
        recovered.posts() == textbook.posts(),
        "recovered posts equal originals",
        || recovered.render(),
    );
    Ok(())
}

fn test_add_post(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "AddPost";
    let mut textbook = fresh(dir)?;

    let id = textbook.add_post(ADA, ADA_TEXT)?;
    report.check(
        format!("{} - first post gets id 1", name),
        id == 1 && textbook.post_count() == 1,
        "id 1, 1 post",
        || format!("id {}, {} posts", id, textbook.post_count()),
    );

    let rejected = textbook.add_post("", ADA_TEXT);
    report.check(
        format!("{} - empty author rejected", name),
        matches!(rejected, Err(TextBookError::InvalidArgument(_))) && textbook.post_count() == 1,
        "InvalidArgument, count unchanged",
        || format!("{:?}, {} posts", rejected, textbook.post_count()),
    );

    let rejected = textbook.add_post(GRACE, "");
    report.check(
        format!("{} - empty text rejected", name),
        matches!(rejected, Err(TextBookError::InvalidArgument(_))) && textbook.last_id() == 1,
        "InvalidArgument, last id unchanged",
        || format!("{:?}, last id {}", rejected, textbook.last_id()),
    );
    Ok(())
}

fn test_remove_post(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "RemovePost";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;

    let removed = textbook.remove_post(3)?;
    report.check(
        format!("{} - invalid index", name),
        removed.is_none() && textbook.post_count() == 3,
        "None, 3 posts",
        || format!("{:?}, {} posts", removed.map(|p| p.id()), textbook.post_count()),
    );

    let removed = textbook.remove_post(0)?;
    let removed_author = removed.as_ref().map(|p| p.author().to_string());
    report.check(
        format!("{} - valid index returns post", name),
        removed_author.as_deref() == Some(ADA),
        ADA,
        || format!("{:?}", removed_author),
    );

    let shifted = textbook.get(0).map(|p| p.author().to_string());
    report.check(
        format!("{} - later posts shift down", name),
        shifted.as_deref() == Some(KATHERINE) && textbook.post_count() == 2,
        KATHERINE,
        || format!("{:?}", shifted),
    );

    let recovered = reopen(dir)?;
    report.check(
        format!("{} - removal survives restart", name),
        recovered.position_of(1).is_none() && recovered.post_count() == 2,
        "id 1 absent, 2 posts",
        || recovered.render(),
    );
    Ok(())
}

fn test_add_comment(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "AddComment";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;
    let before: Vec<Option<String>> = (0..3).map(|i| textbook.post_string(i)).collect();

    let added = textbook.add_comment(3, GRACE, GRACE_REPLY)?;
    let after: Vec<Option<String>> = (0..3).map(|i| textbook.post_string(i)).collect();
    report.check(
        format!("{} - invalid index", name),
        !added && before == after,
        "false, posts unchanged",
        || format!("{}", added),
    );

    let added = textbook.add_comment(1, GRACE, GRACE_REPLY)?;
    let rendered = textbook.post_string(1).unwrap_or_default();
    report.check(
        format!("{} - valid index", name),
        added && rendered.contains(GRACE) && rendered.contains(GRACE_REPLY),
        "true, comment rendered",
        || rendered.clone(),
    );
    Ok(())
}

fn test_last_id(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "LastId";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;

    textbook.remove_post(2)?;
    report.check(
        format!("{} - unchanged by removal", name),
        textbook.last_id() == 3,
        "3",
        || textbook.last_id().to_string(),
    );

    let id = textbook.add_post(GRACE, GRACE_TEXT)?;
    report.check(
        format!("{} - ids are not reused", name),
        id == 4 && textbook.last_id() == 4,
        "4",
        || id.to_string(),
    );
    Ok(())
}

fn test_post_count(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "PostCount";
    let mut textbook = fresh(dir)?;
    let mut counts = vec![textbook.post_count()];
    seed(&mut textbook)?;
    counts.push(textbook.post_count());
    textbook.remove_post(1)?;
    counts.push(textbook.post_count());

    report.check(
        format!("{} - tracks adds and removes", name),
        counts == [0, 3, 2],
        "[0, 3, 2]",
        || format!("{:?}", counts),
    );
    Ok(())
}

fn test_post_string(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "PostString";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;
    textbook.add_comment(0, GRACE, GRACE_REPLY)?;

    report.check(
        format!("{} - invalid index", name),
        textbook.post_string(3).is_none(),
        "None",
        || format!("{:?}", textbook.post_string(3)),
    );

    let rendered = textbook.post_string(0).unwrap_or_default();
    let lines: Vec<&str> = rendered.lines().collect();
    let ok = lines.len() == 4
        && lines[0] == "Post:"
        && lines[1].starts_with("00001 ")
        && lines[1].contains(ADA)
        && lines[2] == "Comments:"
        && lines[3].contains(GRACE_REPLY);
    report.check(format!("{} - post with comments", name), ok, "4-line rendering", || rendered.clone());
    Ok(())
}

fn test_render(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "Render";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;

    let rendered = textbook.render();
    let lines: Vec<&str> = rendered.lines().collect();
    let ok = lines.len() == 4
        && lines[0] == "TextBook contains 3 posts:"
        && lines[1].starts_with("0 - 00001 ")
        && lines[2].starts_with("1 - 00002 ")
        && lines[3].starts_with("2 - 00003 ")
        && lines[3].contains(GRACE);
    report.check(format!("{} - header and indexed posts", name), ok, "header + 3 lines", || rendered.clone());
    Ok(())
}

fn test_posts(dir: &Path, report: &mut TestReport) -> Result<()> {
    let name = "Posts";
    let mut textbook = fresh(dir)?;
    seed(&mut textbook)?;

    let mut copy = textbook.posts();
    copy.clear();
    report.check(
        format!("{} - list is a copy", name),
        textbook.post_count() == 3,
        "3 posts",
        || textbook.post_count().to_string(),
    );

    let copy = textbook.posts();
    if let Some(post) = copy.first() {
        post.add_comment(KATHERINE, KATHERINE_REPLY)?;
    }
    let rendered = textbook.post_string(0).unwrap_or_default();
    report.check(
        format!("{} - posts are shared handles", name),
        rendered.contains(KATHERINE_REPLY),
        "comment visible through store",
        || rendered.clone(),
    );
    Ok(())
}

/// Pick a scratch directory for the suite under `base`
pub fn scratch_dir(base: &Path) -> PathBuf {
    base.join(format!(".selftest-{}", std::process::id()))
}
