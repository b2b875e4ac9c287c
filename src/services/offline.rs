use std::fmt::Write;

use crate::models::{BusinessProfile, MatchedRequirement, Priority};

/// Matched requirements of one category, split into priority buckets
/// (index = priority rank).
pub(crate) struct CategoryGroup<'a> {
    pub category: &'a str,
    pub by_priority: [Vec<&'a MatchedRequirement>; 3],
}

/// Group matches by category in order of first appearance, bucketed by
/// priority inside each category.
pub(crate) fn group_by_category(matches: &[MatchedRequirement]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for matched in matches {
        let index = match groups.iter().position(|g| g.category == matched.category) {
            Some(index) => index,
            None => {
                groups.push(CategoryGroup {
                    category: &matched.category,
                    by_priority: [Vec::new(), Vec::new(), Vec::new()],
                });
                groups.len() - 1
            }
        };
        groups[index].by_priority[matched.priority.rank() as usize].push(matched);
    }
    groups
}

/// Hebrew profile summary block shared by the offline report and the
/// provider prompt.
pub(crate) fn profile_block(business: &BusinessProfile) -> String {
    format!(
        "- שם העסק: {}\n\
         - גודל: {}\n\
         - מספר מקומות ישיבה: {}\n\
         - שטח העסק: {} מ\"ר\n\
         - מספר עובדים במשמרת: {}\n\
         - מאפיינים: {}\n",
        business.business_name,
        business.size,
        business.seats,
        business.area_sqm,
        business.staff_count,
        business.features_summary()
    )
}

fn priority_deadline_he(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "דורש טיפול מיידי",
        Priority::Medium => "דורש טיפול תוך חודש",
        Priority::Low => "דורש טיפול תוך 3 חודשים",
    }
}

/// Generate the deterministic offline compliance report.
///
/// Pure function of (profile, matches): identical inputs yield
/// byte-identical text. No external dependency of any kind; this is the
/// terminal fallback behind every provider.
pub fn generate_report(business: &BusinessProfile, matches: &[MatchedRequirement]) -> String {
    let groups = group_by_category(matches);
    let mut report = String::new();

    let _ = write!(
        report,
        "# דוח רישוי עסק - {}\n\n## סיכום עסקי\n**פרופיל העסק:**\n{}\n---\n\n",
        business.business_name,
        profile_block(business)
    );

    // Section 1: per-category counts by priority
    report.push_str("## 1. סיכום תקנות רלוונטיות\n\n");
    report.push_str(
        "העסק שלך נדרש לעמוד בתקנות רישוי עסקים של מדינת ישראל. התקנות מחולקות \
         לקטגוריות שונות ונועדו להבטיח בטיחות, היגיינה ותפעול תקין.\n\n",
    );
    for group in &groups {
        let _ = writeln!(report, "### {}", group.category);
        for priority in Priority::ALL {
            let count = group.by_priority[priority.rank() as usize].len();
            if count > 0 {
                let _ = writeln!(
                    report,
                    "**{} דרישות בעדיפות {}** - {}",
                    count,
                    priority.label_he(),
                    priority_deadline_he(priority)
                );
            }
        }
        report.push('\n');
    }

    // Section 2: detailed requirements by category and priority
    report.push_str("---\n\n## 2. ארגון לפי קטגוריות\n\n");
    for group in &groups {
        let _ = writeln!(report, "### {}\n", group.category);
        for priority in Priority::ALL {
            let bucket = &group.by_priority[priority.rank() as usize];
            if bucket.is_empty() {
                continue;
            }
            let _ = writeln!(report, "**עדיפות {}:**", priority.label_he());
            for matched in bucket {
                let _ = writeln!(report, "- **{}**: {}", matched.title, matched.description);
            }
            report.push('\n');
        }
    }

    // Section 3: action list ordered by priority
    report.push_str("---\n\n## 3. רשימת פעולות לפי עדיפות\n\n");
    for priority in Priority::ALL {
        let _ = writeln!(
            report,
            "### עדיפות {} ({}) - {}",
            priority.label_he(),
            priority,
            priority_deadline_he(priority)
        );
        let mut index = 0;
        for group in &groups {
            for matched in &group.by_priority[priority.rank() as usize] {
                index += 1;
                let _ = writeln!(
                    report,
                    "{}. **{}** ({})\n   {}\n",
                    index, matched.title, matched.category, matched.description
                );
            }
        }
        if index == 0 {
            let _ = writeln!(report, "אין דרישות בעדיפות {}.\n", priority.label_he());
        }
    }

    // Section 4: fixed next steps
    report.push_str(
        "---\n\n## 4. 3 צעדים קונקרטיים הבאים\n\n\
         ### צעד 1: בדיקה ראשונית\n\
         - בדוק את כל הדרישות בעדיפות גבוהה\n\
         - ודא שיש לך את כל המסמכים הנדרשים\n\n\
         ### צעד 2: פנייה לרשויות\n\
         - פנה לרשות הרישוי המקומית\n\
         - קבל מידע על הליכי הרישוי הספציפיים\n\n\
         ### צעד 3: הכנת מסמכים\n\
         - אסוף את כל המסמכים הנדרשים\n\
         - הגש בקשה לרישוי עסק\n\n\
         ---\n\n\
         **הערה:** דוח זה מבוסס על מידע כללי. מומלץ להתייעץ עם מומחה רישוי \
         עסקים לקבלת ייעוץ ספציפי לעסק שלך.\n\n\
         *נוצר על ידי Licensure Buddy IL - מערכת סיוע לרישוי עסקים בישראל*\n",
    );

    report
}
