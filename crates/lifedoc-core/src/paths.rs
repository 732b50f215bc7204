//! Document and blob locations for a user's data.

const USER_INFO_COLLECTION: &str = "userInfo";
const USER_DIARIES_COLLECTION: &str = "userDiaries";
const DIARIES_SUBCOLLECTION: &str = "diaries";

/// `userInfo/{uid}`
pub fn user_info_document(user_id: &str) -> String {
    format!("{USER_INFO_COLLECTION}/{user_id}")
}

/// `userDiaries/{uid}/diaries`
pub fn diaries_collection(user_id: &str) -> String {
    format!("{USER_DIARIES_COLLECTION}/{user_id}/{DIARIES_SUBCOLLECTION}")
}

/// `userDiaries/{uid}/diaries/{diary_id}`
pub fn diary_document(user_id: &str, diary_id: &str) -> String {
    format!("{}/{diary_id}", diaries_collection(user_id))
}

/// `{uid}/diary/{image_id}`, where `image_id` already carries the `.jpg` suffix.
pub fn diary_image(user_id: &str, image_id: &str) -> String {
    format!("{user_id}/diary/{image_id}")
}

/// `{uid}/userInfo/profilePicture.jpg`
pub fn profile_picture(user_id: &str) -> String {
    format!("{user_id}/userInfo/profilePicture.jpg")
}
