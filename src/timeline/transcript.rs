//! Scripted terminal sessions that accompany each tutorial step.

use serde::Serialize;

use super::Step;

/// One command typed at the prompt and what the terminal printed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub command: &'static str,

    /// Empty when the command prints nothing.
    pub output: &'static str,
}

const fn ex(command: &'static str, output: &'static str) -> Exchange {
    Exchange { command, output }
}

const CHECKOUT_DEVELOP: Exchange = ex(
    "git checkout develop",
    "Switched to branch 'develop'\nYour branch is up to date with 'origin/develop'.",
);

const CHECKOUT_MAIN: Exchange = ex(
    "git checkout main",
    "Switched to branch 'main'\nYour branch is up to date with 'origin/main'.",
);

const PUSH_MAIN_TAGS: &str = "Counting objects: 5, done.\nDelta compression using up to 4 threads.\n\
Compressing objects: 100% (3/3), done.\nWriting objects: 100% (5/5), 734 bytes | 734.00 KiB/s, done.\n\
Total 5 (delta 2), reused 0 (delta 0)\nTo github.com:user/repo.git";

const PUSH_DEVELOP: &str = "Counting objects: 7, done.\nDelta compression using up to 4 threads.\n\
Compressing objects: 100% (5/5), done.\nWriting objects: 100% (7/7), 734 bytes | 734.00 KiB/s, done.\n\
Total 7 (delta 3), reused 0 (delta 0)\nTo github.com:user/repo.git";

const MAIN_AND_DEVELOP: &[Exchange] = &[
    ex("git checkout -b develop", "Switched to a new branch 'develop'"),
    ex(
        "git push -u origin develop",
        "Total 0 (delta 0), reused 0 (delta 0)\n * [new branch]      develop -> develop\n\
Branch 'develop' set up to track remote branch 'develop' from 'origin'.",
    ),
];

const FEATURE: &[Exchange] = &[
    CHECKOUT_DEVELOP,
    ex("git checkout -b feature/login", "Switched to a new branch 'feature/login'"),
    ex(
        "git push -u origin feature/login",
        "Total 0 (delta 0), reused 0 (delta 0)\n * [new branch]      feature/login -> feature/login\n\
Branch 'feature/login' set up to track remote branch 'feature/login' from 'origin'.",
    ),
    ex("git add .", ""),
    ex(
        "git commit -m \"Add login form\"",
        "[feature/login abc1234] Add login form\n 2 files changed, 57 insertions(+), 0 deletions(-)",
    ),
    ex(
        "git commit -m \"Implement authentication\"",
        "[feature/login def5678] Implement authentication\n 3 files changed, 124 insertions(+), 2 deletions(-)",
    ),
    CHECKOUT_DEVELOP,
    ex(
        "git merge --no-ff feature/login",
        "Merge made by the 'recursive' strategy.\n 5 files changed, 181 insertions(+), 2 deletions(-)\n\
Create mode 100644 src/components/Login.jsx\nCreate mode 100644 src/services/auth.js",
    ),
    ex(
        "git push origin develop",
        "Counting objects: 15, done.\nDelta compression using up to 4 threads.\n\
Compressing objects: 100% (13/13), done.\nWriting objects: 100% (15/15), 2.34 KiB | 797.00 KiB/s, done.\n\
Total 15 (delta 5), reused 0 (delta 0)\nTo github.com:user/repo.git\n   abc1234..hij9012  develop -> develop",
    ),
];

const RELEASE: &[Exchange] = &[
    CHECKOUT_DEVELOP,
    ex("git checkout -b release/1.0", "Switched to a new branch 'release/1.0'"),
    ex(
        "git push -u origin release/1.0",
        "Total 0 (delta 0), reused 0 (delta 0)\n * [new branch]      release/1.0 -> release/1.0\n\
Branch 'release/1.0' set up to track remote branch 'release/1.0' from 'origin'.",
    ),
    CHECKOUT_MAIN,
    ex(
        "git merge --no-ff release/1.0",
        "Merge made by the 'recursive' strategy.\n 8 files changed, 32 insertions(+), 10 deletions(-)",
    ),
    ex("git tag -a v1.0 -m \"Version 1.0\"", ""),
    ex("git push origin main --tags", PUSH_MAIN_TAGS),
    CHECKOUT_DEVELOP,
    ex(
        "git merge --no-ff release/1.0",
        "Merge made by the 'recursive' strategy.\n 2 files changed, 5 insertions(+), 1 deletion(-)",
    ),
    ex("git push origin develop", PUSH_DEVELOP),
    ex("git branch -d release/1.0", "Deleted branch release/1.0 (was tuv4567)."),
];

const HOTFIX: &[Exchange] = &[
    CHECKOUT_MAIN,
    ex("git checkout -b hotfix/1.0.1", "Switched to a new branch 'hotfix/1.0.1'"),
    ex(
        "git push -u origin hotfix/1.0.1",
        "Total 0 (delta 0), reused 0 (delta 0)\n * [new branch]      hotfix/1.0.1 -> hotfix/1.0.1\n\
Branch 'hotfix/1.0.1' set up to track remote branch 'hotfix/1.0.1' from 'origin'.",
    ),
    ex("git add .", ""),
    ex(
        "git commit -m \"Fix critical security issue\"",
        "[hotfix/1.0.1 wxy5678] Fix critical security issue\n 1 file changed, 5 insertions(+), 2 deletions(-)",
    ),
    CHECKOUT_MAIN,
    ex(
        "git merge --no-ff hotfix/1.0.1",
        "Merge made by the 'recursive' strategy.\n 1 file changed, 5 insertions(+), 2 deletions(-)",
    ),
    ex("git tag -a v1.0.1 -m \"Version 1.0.1\"", ""),
    ex("git push origin main --tags", PUSH_MAIN_TAGS),
    CHECKOUT_DEVELOP,
    ex(
        "git merge --no-ff hotfix/1.0.1",
        "Merge made by the 'recursive' strategy.\n 1 file changed, 5 insertions(+), 2 deletions(-)",
    ),
    ex("git push origin develop", PUSH_DEVELOP),
    ex("git branch -d hotfix/1.0.1", "Deleted branch hotfix/1.0.1 (was wxy5678)."),
];

const COLLABORATION: &[Exchange] = &[
    CHECKOUT_DEVELOP,
    ex("git pull", "Already up to date."),
    ex("git checkout -b feature/profile", "Switched to a new branch 'feature/profile'"),
    ex("git push -u origin feature/profile", " * [new branch]      feature/profile -> feature/profile"),
    CHECKOUT_DEVELOP,
    ex("git pull", "Already up to date."),
    ex("git checkout -b feature/dashboard", "Switched to a new branch 'feature/dashboard'"),
    ex("git push -u origin feature/dashboard", " * [new branch]      feature/dashboard -> feature/dashboard"),
    ex("git add .", ""),
    ex(
        "git commit -m \"Add user profile page\"",
        "[feature/profile def0123] Add user profile page\n 3 files changed, 147 insertions(+), 0 deletions(-)",
    ),
    ex("git push origin feature/profile", "   ghi4567..jkl8901  feature/profile -> feature/profile"),
    ex("git add .", ""),
    ex(
        "git commit -m \"Create dashboard layout\"",
        "[feature/dashboard mno2345] Create dashboard layout\n 4 files changed, 211 insertions(+), 0 deletions(-)",
    ),
    ex("git push origin feature/dashboard", "   pqr6789..stu0123  feature/dashboard -> feature/dashboard"),
    CHECKOUT_DEVELOP,
    ex(
        "git pull",
        "From github.com:user/repo\n   abc7890..vwx4567  develop     -> origin/develop\n\
Updating abc7890..vwx4567\nFast-forward\n 7 files changed, 358 insertions(+), 0 deletions(-)",
    ),
];

// Practice scenarios: starting a feature, resolving a conflict, cutting a
// release and shipping a hotfix. Only the commands are scripted.
const PRACTICE: &[Exchange] = &[
    ex("git checkout develop", ""),
    ex("git pull", ""),
    ex("git checkout -b feature/notifications", ""),
    ex("git add .", ""),
    ex("git commit -m \"Add notification component\"", ""),
    ex("git push -u origin feature/notifications", ""),
    ex("git checkout feature/notifications", ""),
    ex("git merge develop", ""),
    ex("git add src/App.jsx", ""),
    ex("git commit -m \"Resolve merge conflicts with develop\"", ""),
    ex("git push origin feature/notifications", ""),
    ex("git checkout develop", ""),
    ex("git checkout -b release/2.0", ""),
    ex("git add .", ""),
    ex("git commit -m \"Bump version to 2.0\"", ""),
    ex("git push -u origin release/2.0", ""),
    ex("git checkout main", ""),
    ex("git checkout -b hotfix/2.0.1", ""),
    ex("git add .", ""),
    ex("git commit -m \"Fix authentication bypass vulnerability\"", ""),
    ex("git push -u origin hotfix/2.0.1", ""),
    ex("git checkout main", ""),
    ex("git merge --no-ff hotfix/2.0.1", ""),
    ex("git tag -a v2.0.1 -m \"Version 2.0.1\"", ""),
    ex("git push origin main --tags", ""),
    ex("git checkout develop", ""),
    ex("git merge --no-ff hotfix/2.0.1", ""),
    ex("git push origin develop", ""),
];

/// The terminal session shown alongside `step`. The introduction has none.
pub fn transcript(step: Step) -> &'static [Exchange] {
    match step {
        Step::Introduction => &[],
        Step::MainAndDevelop => MAIN_AND_DEVELOP,
        Step::Feature => FEATURE,
        Step::Release => RELEASE,
        Step::Hotfix => HOTFIX,
        Step::Collaboration => COLLABORATION,
        Step::Practice => PRACTICE,
    }
}
