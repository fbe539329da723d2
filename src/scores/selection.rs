use crate::api::ScoreApi;
use crate::scores::form::ScoreForm;

/// Fills the class select. Failures leave the previous options in place.
pub async fn load_class_options(form: &mut ScoreForm, api: &dyn ScoreApi) {
    match api.classes().await {
        Ok(classes) => {
            tracing::debug!(count = classes.len(), "Class options loaded");
            form.class_options = classes;
        }
        Err(err) => tracing::warn!(error = %err, "Failed to load class options"),
    }
}

/// Selecting a class clears the student choice and reloads its students.
pub async fn select_class(form: &mut ScoreForm, api: &dyn ScoreApi, class_id: &str) {
    form.class_id = class_id.to_string();
    form.student_id.clear();
    form.student_options.clear();

    if class_id.is_empty() {
        return;
    }

    match api.students(Some(class_id)).await {
        Ok(students) => form.student_options = students,
        Err(err) => tracing::warn!(error = %err, class_id, "Failed to load students"),
    }
}
