
use actix_web::{http::StatusCode, test};
use portfolio_site::{
    entities::{
        contact_message::ContactMessage,
        project::Project,
        resume_item::ResumeItemType,
        skill::{Skill, SkillCategory},
        token::AuthResponse,
    },
    repositories::store::Store,
    storage::images::ImageUpload,
};
use serde_json::{json, Value};
use test_utils::*;

fn resume_item_json(title: &str, item_type: &str, order: i32, start: &str) -> Value {
    json!({
        "title": title,
        "company_or_institution": "Acme",
        "location": "Remote",
        "start_date": start,
        "end_date": null,
        "description": "Built things",
        "display_order": order,
        "item_type": item_type
    })
}

fn about_me_json(title: &str) -> Value {
    json!({
        "title": title,
        "short_description": "Backend engineer",
        "full_description": "I write **Rust**.<script>alert(1)</script>",
        "twitter_url": "",
        "linkedin_url": null,
        "github_url": "https://github.com/someone"
    })
}

#[actix_rt::test]
async fn login_with_seeded_admin_returns_a_token() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/account/login")
        .set_json(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.token_type, "Bearer");
    assert_eq!(body.expires_in, 3600);

    let claims = app.jwt.decode_jwt(&body.access_token).unwrap().claims;
    assert_eq!(claims.email, ADMIN_EMAIL);
    assert!(claims.is_admin());

    // The issued token opens the admin area.
    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(("Authorization", format!("Bearer {}", body.access_token)))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/account/login")
        .set_json(json!({"email": ADMIN_EMAIL, "password": "not-the-password"}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Wrong credentials");
}

#[actix_rt::test]
async fn repeated_failures_lock_the_account() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    for _ in 0..app.config.login_max_failures {
        let req = test::TestRequest::post()
            .uri("/account/login")
            .set_json(json!({"email": ADMIN_EMAIL, "password": "guess"}))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let req = test::TestRequest::post()
        .uri("/account/login")
        .set_json(json!({"email": ADMIN_EMAIL.to_uppercase(), "password": ADMIN_PASSWORD}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[actix_rt::test]
async fn admin_area_requires_a_token() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    for uri in ["/admin/dashboard", "/admin/projects", "/admin/skills", "/admin"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_area_requires_the_admin_role() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(app.visitor_bearer())
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn resume_items_crud_with_soft_and_hard_delete() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/admin/resume-items")
        .insert_header(app.admin_bearer())
        .set_json(resume_item_json("Engineer", "experience", 1, "2021-03-01"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Resume item created successfully.");
    let id = body["id"].as_str().unwrap().to_string();

    let mut updated = resume_item_json("Senior Engineer", "experience", 2, "2021-03-01");
    updated["end_date"] = json!("2023-01-31");
    let req = test::TestRequest::put()
        .uri(&format!("/admin/resume-items/{id}"))
        .insert_header(app.admin_bearer())
        .set_json(updated)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Senior Engineer");
    assert_eq!(body["data"]["end_date"], "2023-01-31");

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/resume-items/{id}"))
        .insert_header(app.admin_bearer())
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/resume-items/{id}"))
        .insert_header(app.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);

    // Soft-deleted rows can still be purged.
    let req = test::TestRequest::delete()
        .uri(&format!("/admin/resume-items/{id}?hard_delete=true"))
        .insert_header(app.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/resume-items/{id}?hard_delete=true"))
        .insert_header(app.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn resume_item_with_end_before_start_is_rejected() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let mut item = resume_item_json("Engineer", "experience", 1, "2021-03-01");
    item["end_date"] = json!("2020-01-01");
    let req = test::TestRequest::post()
        .uri("/admin/resume-items")
        .insert_header(app.admin_bearer())
        .set_json(item)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn skills_are_listed_by_category_then_display_order() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    for (name, category, order) in [
        ("Docker", "tools", 1),
        ("Rust", "languages", 2),
        ("Go", "languages", 1),
        ("Leadership", "professional_skills", 5),
    ] {
        let req = test::TestRequest::post()
            .uri("/admin/skills")
            .insert_header(app.admin_bearer())
            .set_json(json!({"name": name, "category": category, "display_order": order}))
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/admin/skills")
        .insert_header(app.admin_bearer())
        .to_request();
    let skills: Vec<Skill> = test::call_and_read_body_json(&service, req).await;
    let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Leadership", "Go", "Rust", "Docker"]);
}

#[actix_rt::test]
async fn blank_skill_name_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/admin/skills")
        .insert_header(app.admin_bearer())
        .set_json(json!({"name": "   ", "category": "tools"}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "name");
}

#[actix_rt::test]
async fn malformed_ids_are_rejected() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::get()
        .uri("/admin/skills/not-a-uuid")
        .insert_header(app.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/projects/not-a-uuid").to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn about_me_is_a_singleton() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::get()
        .uri("/admin/about-me")
        .insert_header(app.admin_bearer())
        .to_request();
    let current: Value = test::call_and_read_body_json(&service, req).await;
    assert!(current.is_null());

    let req = test::TestRequest::post()
        .uri("/admin/about-me")
        .insert_header(app.admin_bearer())
        .set_json(about_me_json("Hi, I'm a developer"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert!(body["data"]["twitter_url"].is_null());

    let req = test::TestRequest::post()
        .uri("/admin/about-me")
        .insert_header(app.admin_bearer())
        .set_json(about_me_json("Second"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Once deleted, a new record may be created.
    let req = test::TestRequest::delete()
        .uri(&format!("/admin/about-me/{id}"))
        .insert_header(app.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/admin/about-me")
        .insert_header(app.admin_bearer())
        .set_json(about_me_json("Fresh start"))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn contact_messages_are_marked_read_when_opened() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "subject": "Hello",
            "message": "I would like to work with you."
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Thank you for your message! I'll get back to you soon.");

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(app.admin_bearer())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(stats["total_messages"], 1);
    assert_eq!(stats["unread_messages"], 1);

    let req = test::TestRequest::get()
        .uri("/admin/contact-messages")
        .insert_header(app.admin_bearer())
        .to_request();
    let messages: Vec<ContactMessage> = test::call_and_read_body_json(&service, req).await;
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].is_read);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/contact-messages/{}", messages[0].meta.id))
        .insert_header(app.admin_bearer())
        .to_request();
    let opened: ContactMessage = test::call_and_read_body_json(&service, req).await;
    assert!(opened.is_read);

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(app.admin_bearer())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(stats["unread_messages"], 0);
}

#[actix_rt::test]
async fn invalid_contact_message_is_rejected() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "Visitor",
            "email": "not-an-email",
            "subject": "Hello",
            "message": "short"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["email", "message"]);
    assert_eq!(app.store.row_count::<ContactMessage>(), 0);
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/contact")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn resume_page_orders_items_and_skills() {
    let app = TestApp::spawn().await;
    {
        let mut uow = app.unit_of_work().await;
        uow.resume_items()
            .add(resume_item("Older", ResumeItemType::Experience, 1, date(2018, 1, 1)))
            .unwrap();
        uow.resume_items()
            .add(resume_item("Newer", ResumeItemType::Experience, 1, date(2022, 1, 1)))
            .unwrap();
        uow.resume_items()
            .add(resume_item("Pinned", ResumeItemType::Experience, 9, date(2010, 1, 1)))
            .unwrap();
        uow.resume_items()
            .add(resume_item("Degree", ResumeItemType::Education, 0, date(2012, 9, 1)))
            .unwrap();

        uow.skills().add(skill("Mentoring", SkillCategory::ProfessionalSkills, 1)).unwrap();
        uow.skills().add(skill("Architecture", SkillCategory::ProfessionalSkills, 3)).unwrap();
        uow.skills().add(skill("Rust", SkillCategory::Languages, 2)).unwrap();
        uow.skills().add(skill("SQL", SkillCategory::Languages, 1)).unwrap();
        let hidden = uow.skills().add(skill("Perl", SkillCategory::Languages, 0)).unwrap();
        uow.save_changes().await.unwrap();

        uow.skills().delete_soft(hidden.meta.id).await.unwrap();
        uow.save_changes().await.unwrap();
    }

    let service = app.service().await;
    let req = test::TestRequest::get().uri("/resume").to_request();
    let view: Value = test::call_and_read_body_json(&service, req).await;

    let titles = |key: &str, field: &str| -> Vec<String> {
        view[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v[field].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(titles("experiences", "title"), vec!["Pinned", "Newer", "Older"]);
    assert_eq!(titles("educations", "title"), vec!["Degree"]);
    assert_eq!(titles("professional_skills", "name"), vec!["Architecture", "Mentoring"]);
    assert_eq!(titles("languages", "name"), vec!["SQL", "Rust"]);
    assert!(view["about_me"].is_null());
}

#[actix_rt::test]
async fn public_projects_hide_soft_deleted_ones() {
    let app = TestApp::spawn().await;
    let (kept, removed) = {
        let mut uow = app.unit_of_work().await;
        let mut featured = project("Kept");
        featured.is_featured = true;
        let kept = uow.projects().add(featured).unwrap();
        let removed = uow.projects().add(project("Removed")).unwrap();
        uow.save_changes().await.unwrap();
        uow.projects().delete_soft(removed.meta.id).await.unwrap();
        uow.save_changes().await.unwrap();
        (kept, removed)
    };

    let service = app.service().await;

    let req = test::TestRequest::get().uri("/projects").to_request();
    let projects: Vec<Project> = test::call_and_read_body_json(&service, req).await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].meta.id, kept.meta.id);

    let req = test::TestRequest::get()
        .uri(&format!("/projects/{}", removed.meta.id))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/").to_request();
    let home: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(home["featured_projects"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn home_renders_about_me_markdown_safely() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::post()
        .uri("/admin/about-me")
        .insert_header(app.admin_bearer())
        .set_json(about_me_json("Hello"))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/").to_request();
    let home: Value = test::call_and_read_body_json(&service, req).await;
    let html = home["about_me"]["full_description_html"].as_str().unwrap();
    assert!(html.contains("<strong>Rust</strong>"));
    assert!(!html.contains("<script>"));
}

#[actix_rt::test]
async fn health_reports_the_database() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(app.store.check_connection().await.is_ok());
}

#[actix_rt::test]
async fn stored_project_images_are_served() {
    let app = TestApp::spawn().await;
    let service = app.service().await;

    let incoming = tempfile::TempDir::new().unwrap();
    let source = incoming.path().join("upload.tmp");
    std::fs::write(&source, b"png bytes").unwrap();
    let upload = ImageUpload {
        file_name: "cover.png".to_string(),
        content_type: Some("image/png".to_string()),
        size: 9,
        source,
    };
    let url = app.state.images.save(Some(&upload)).await.unwrap().unwrap();

    let req = test::TestRequest::get().uri(&url).to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"png bytes");

    for uri in ["/images/projects/missing.png", "/images/projects/..", "/images/projects/%2E%2E%5Csecret"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
