//! Post pages: listings, profile, post detail and the post form.

use uuid::Uuid;

use yatube_core::Page;
use yatube_core::domain::{Group, User};
use yatube_shared::{FormErrors, PostForm};

use super::{Template, escape, form_errors, layout, linebreaks, paginator};
use crate::context::{CommentCard, PostCard};
use crate::middleware::auth::Identity;

const DATE_FORMAT: &str = "%d %B %Y";

fn post_card(card: &PostCard, show_group_link: bool) -> String {
    let post = &card.post;
    let mut out = String::from("<article class=\"post\">\n<ul>\n");
    out.push_str(&format!(
        "<li>Author: <a href=\"/profile/{0}/\">{0}</a></li>\n",
        escape(&card.author)
    ));
    out.push_str(&format!(
        "<li>Published: {}</li>\n",
        post.pub_date.format(DATE_FORMAT)
    ));
    out.push_str("</ul>\n");
    if let Some(image) = &post.image {
        out.push_str(&format!(
            "<img class=\"card-img\" src=\"/media/{}\" alt=\"\">\n",
            escape(image)
        ));
    }
    out.push_str(&format!("<p>{}</p>\n", linebreaks(&post.text)));
    out.push_str(&format!(
        "<a href=\"/posts/{}/\">Details</a>\n",
        post.id
    ));
    if show_group_link {
        if let Some(group) = &card.group {
            out.push_str(&format!(
                "<a href=\"/group/{}/\">All posts of the group {}</a>\n",
                escape(&group.slug),
                escape(&group.title)
            ));
        }
    }
    out.push_str("</article>");
    out
}

fn post_list(page: &Page<PostCard>, show_group_link: bool) -> String {
    let mut out = String::new();
    for card in page {
        out.push_str(&post_card(card, show_group_link));
        out.push_str("\n<hr>\n");
    }
    out.push_str(&paginator(page));
    out
}

/// Tabs switching between all posts and the subscription feed.
fn feed_switch(viewer: Option<&Identity>, index_active: bool) -> String {
    if viewer.is_none() {
        return String::new();
    }
    let (all, follow) = if index_active {
        (" class=\"active\"", "")
    } else {
        ("", " class=\"active\"")
    };
    format!(
        "<ul class=\"tabs\"><li><a href=\"/\"{all}>All posts</a></li><li><a href=\"/follow/\"{follow}>Subscriptions</a></li></ul>"
    )
}

pub fn index(viewer: Option<&Identity>, page: &Page<PostCard>) -> String {
    let content = format!(
        "<h1>Latest updates</h1>\n{}\n{}",
        feed_switch(viewer, true),
        post_list(page, true)
    );
    layout(Template::Index, "Latest updates", viewer, &content)
}

pub fn follow(viewer: Option<&Identity>, page: &Page<PostCard>) -> String {
    let content = format!(
        "<h1>Subscriptions</h1>\n{}\n{}",
        feed_switch(viewer, false),
        post_list(page, true)
    );
    layout(Template::Follow, "Subscriptions", viewer, &content)
}

pub fn group_list(viewer: Option<&Identity>, group: &Group, page: &Page<PostCard>) -> String {
    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        escape(&group.title),
        linebreaks(&group.description),
        post_list(page, false)
    );
    layout(
        Template::GroupList,
        &format!("Group posts {}", group.title),
        viewer,
        &content,
    )
}

/// Everything the profile page shows besides the posts.
pub struct ProfileView<'a> {
    pub author: &'a User,
    pub page: &'a Page<PostCard>,
    pub following: bool,
    pub followers: u64,
    pub following_count: u64,
}

pub fn profile(viewer: Option<&Identity>, view: &ProfileView<'_>) -> String {
    let username = escape(&view.author.username);
    let mut content = format!(
        "<h1>All posts of {username}</h1>\n<h3>Posts: {}</h3>\n<p>Followers: {} | Following: {}</p>\n",
        view.page.total(),
        view.followers,
        view.following_count
    );

    let can_follow = viewer.is_some_and(|identity| identity.user_id != view.author.id);
    if can_follow {
        if view.following {
            content.push_str(&format!(
                "<a class=\"btn\" href=\"/profile/{username}/unfollow/\" role=\"button\">Unfollow</a>\n"
            ));
        } else {
            content.push_str(&format!(
                "<a class=\"btn\" href=\"/profile/{username}/follow/\" role=\"button\">Follow</a>\n"
            ));
        }
    }

    content.push_str(&post_list(view.page, true));
    layout(
        Template::Profile,
        &format!("Profile of {}", view.author.username),
        viewer,
        &content,
    )
}

/// Everything the post page shows.
pub struct PostDetailView<'a> {
    pub card: &'a PostCard,
    pub author_posts: u64,
    pub comments: &'a [CommentCard],
}

pub fn post_detail(viewer: Option<&Identity>, view: &PostDetailView<'_>) -> String {
    let card = view.card;
    let post = &card.post;
    let mut content = String::from("<aside>\n<ul>\n");
    content.push_str(&format!(
        "<li>Published: {}</li>\n",
        post.pub_date.format(DATE_FORMAT)
    ));
    if let Some(group) = &card.group {
        content.push_str(&format!(
            "<li>Group: {0}<br><a href=\"/group/{1}/\">All posts of the group</a></li>\n",
            escape(&group.title),
            escape(&group.slug)
        ));
    }
    content.push_str(&format!(
        "<li>Author: {0}</li>\n<li>Posts by the author: <span>{1}</span></li>\n<li><a href=\"/profile/{0}/\">All posts of the user</a></li>\n",
        escape(&card.author),
        view.author_posts
    ));
    content.push_str("</ul>\n</aside>\n<article>\n");
    if let Some(image) = &post.image {
        content.push_str(&format!(
            "<img class=\"card-img\" src=\"/media/{}\" alt=\"\">\n",
            escape(image)
        ));
    }
    content.push_str(&format!("<p>{}</p>\n", linebreaks(&post.text)));
    if viewer.is_some_and(|identity| post.is_authored_by(identity.user_id)) {
        content.push_str(&format!(
            "<a class=\"btn\" href=\"/posts/{}/edit/\">Edit post</a>\n",
            post.id
        ));
    }
    content.push_str("</article>\n");

    if viewer.is_some() {
        content.push_str(&format!(
            concat!(
                "<form method=\"post\" action=\"/posts/{}/comment/\">\n",
                "<h5>Add a comment:</h5>\n",
                "<textarea name=\"text\" required></textarea>\n",
                "<button type=\"submit\">Send</button>\n",
                "</form>\n"
            ),
            post.id
        ));
    }

    content.push_str("<section class=\"comments\">\n");
    for card in view.comments {
        content.push_str(&format!(
            "<div class=\"comment\"><h5><a href=\"/profile/{0}/\">{0}</a></h5><p>{1}</p></div>\n",
            escape(&card.author),
            linebreaks(&card.comment.text)
        ));
    }
    content.push_str("</section>");

    layout(
        Template::PostDetail,
        &format!("Post {}", post.short_text()),
        viewer,
        &content,
    )
}

/// Create/edit form. `editing` carries the edited post's ID.
pub fn create_post(
    viewer: Option<&Identity>,
    form: &PostForm,
    errors: &FormErrors,
    groups: &[Group],
    editing: Option<Uuid>,
) -> String {
    let (heading, action, submit) = match editing {
        Some(id) => ("Edit post", format!("/posts/{id}/edit/"), "Save"),
        None => ("New post", "/create/".to_string(), "Add"),
    };

    let selected = form.selected_group();
    let mut options = String::from("<option value=\"\">---------</option>\n");
    for group in groups {
        let id = group.id.to_string();
        let marker = if selected == Some(id.as_str()) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{id}\"{marker}>{}</option>\n",
            escape(&group.title)
        ));
    }

    let mut content = format!("<h1>{heading}</h1>\n");
    content.push_str(&form_errors(errors, yatube_shared::errors::NON_FIELD_ERRORS));
    content.push_str(&format!(
        concat!(
            "<form method=\"post\" action=\"{action}\">\n",
            "<label for=\"id_text\">Text</label>\n",
            "<textarea name=\"text\" id=\"id_text\" required>{text}</textarea>\n",
            "{text_errors}",
            "<label for=\"id_group\">Group</label>\n",
            "<select name=\"group\" id=\"id_group\">\n{options}</select>\n",
            "{group_errors}",
            "<label for=\"id_image\">Image</label>\n",
            "<input type=\"text\" name=\"image\" id=\"id_image\" value=\"{image}\">\n",
            "{image_errors}",
            "<button type=\"submit\">{submit}</button>\n",
            "</form>"
        ),
        action = action,
        text = escape(&form.text),
        text_errors = form_errors(errors, "text"),
        options = options,
        group_errors = form_errors(errors, "group"),
        image = escape(form.image.as_deref().unwrap_or_default()),
        image_errors = form_errors(errors, "image"),
        submit = submit,
    ));

    layout(Template::CreatePost, heading, viewer, &content)
}

#[cfg(test)]
mod tests {
    use yatube_core::domain::Post;

    use super::*;

    fn card(text: &str) -> PostCard {
        PostCard {
            post: Post::new(Uuid::new_v4(), text.to_string(), None, Some("cat.gif".to_string())),
            author: "leo".to_string(),
            group: None,
        }
    }

    #[test]
    fn test_index_renders_cards_escaped() {
        let page = Page::from_vec(vec![card("<b>bold</b>")], None, 10);
        let html = index(None, &page);
        assert!(html.contains("data-template=\"posts/index.html\""));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("/media/posts/cat.gif"));
        assert!(html.contains("/profile/leo/"));
    }

    #[test]
    fn test_create_post_marks_selected_group() {
        let group = Group::new("Cats".to_string(), "cats".to_string(), String::new());
        let form = PostForm::prefilled("text", Some(group.id), None);
        let html = create_post(None, &form, &FormErrors::new(), &[group.clone()], Some(Uuid::nil()));
        assert!(html.contains(&format!("<option value=\"{}\" selected>", group.id)));
        assert!(html.contains("Edit post"));
    }
}
