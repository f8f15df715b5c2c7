table! {
    articles (article_id) {
        article_id -> Int4,
        title -> Nullable<Varchar>,
        topic -> Nullable<Varchar>,
        author -> Nullable<Varchar>,
        body -> Nullable<Text>,
        created_at -> Nullable<Timestamp>,
        votes -> Nullable<Int4>,
        article_img_url -> Nullable<Varchar>,
    }
}

table! {
    comments (comment_id) {
        comment_id -> Int4,
        article_id -> Nullable<Int4>,
        body -> Nullable<Text>,
        votes -> Nullable<Int4>,
        author -> Nullable<Varchar>,
        created_at -> Nullable<Timestamp>,
    }
}

table! {
    topics (slug) {
        slug -> Varchar,
        description -> Nullable<Varchar>,
        img_url -> Nullable<Varchar>,
    }
}

table! {
    users (username) {
        username -> Varchar,
        name -> Nullable<Varchar>,
        avatar_url -> Nullable<Varchar>,
    }
}

joinable!(articles -> topics (topic));
joinable!(articles -> users (author));
joinable!(comments -> articles (article_id));
joinable!(comments -> users (author));

allow_tables_to_appear_in_same_query!(articles, comments, topics, users,);
